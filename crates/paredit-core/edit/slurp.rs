//! Slurp and barf: move a list's bracket over its neighbour
//!
//! Slurping pulls the next (or previous) sibling into the list; barfing
//! pushes the last (or first) child out. Barf moves the bracket verbatim, so
//! slurp followed by barf restores the buffer exactly unless slurp had to
//! insert a space to keep two atoms from fusing.

use crate::cursor::{ListRange, TokenStream};
use crate::navigation::{sexp_after, sexp_before};
use crate::tokenizer::TokenType;
use crate::utils::Span;

use super::{checked_plan, target_list, Bias, EditOutcome, EditSelection, TextEdit};

/// Whether text ending in `left` followed directly by `right` lexes as one atom
fn would_fuse(left: Option<TokenType>, right: Option<TokenType>) -> bool {
    matches!(left, Some(TokenType::Atom))
        && matches!(right, Some(TokenType::Atom | TokenType::ReaderMacro))
}

fn token_type_at(stream: &TokenStream<'_>, offset: usize) -> Option<TokenType> {
    stream.cursor_at(offset).token().map(|token| token.token_type)
}

fn token_type_before(stream: &TokenStream<'_>, offset: usize) -> Option<TokenType> {
    stream
        .cursor_at(offset)
        .prev_token()
        .map(|token| token.token_type)
}

fn outcome(
    stream: &TokenStream<'_>,
    edits: Vec<TextEdit>,
    selection: EditSelection,
    bias: Bias,
) -> EditOutcome {
    let selection = selection.map(&edits, bias);
    checked_plan(stream, edits, selection)
}

fn close_text<'a>(stream: &TokenStream<'a>, list: &ListRange) -> &'a str {
    &stream.source()[list.close.start..list.close.end]
}

fn opener_text<'a>(stream: &TokenStream<'a>, list: &ListRange) -> &'a str {
    &stream.source()[list.outer_start..list.open.end]
}

/// Where a forward slurp puts the closing bracket after `sibling`
///
/// A line comment trailing the sibling on the same line goes into the list
/// too, with the bracket at the start of the following line. A comment that
/// runs to the end of the buffer stays outside.
fn slurped_close_offset(stream: &TokenStream<'_>, sibling: Span) -> usize {
    let mut cursor = stream.cursor_at(sibling.end);
    if cursor
        .token()
        .is_some_and(|token| token.is_whitespace() && !token.span.contains(['\n', '\r']))
    {
        cursor.forward_token();
    }
    let Some(comment) = cursor
        .token()
        .filter(|token| token.token_type == TokenType::LineComment)
    else {
        return sibling.end;
    };
    let rest = &stream.source()[comment.end()..];
    let newline = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with(['\n', '\r']) {
        1
    } else {
        return sibling.end;
    };
    comment.end() + newline
}

/// Move the closing bracket past the next sibling
///
/// `(foo|) bar` becomes `(foo| bar)`. From just after the list, the caret
/// follows the bracket: `(foo)| bar` becomes `(foo bar|)`.
#[must_use]
pub fn forward_slurp(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let Some(list) = target_list(&stream, selection.active) else {
        return EditOutcome::NotApplicable;
    };
    let Some(sibling) = sexp_after(&stream, list.close.end) else {
        return EditOutcome::NotApplicable;
    };

    let needs_space = sibling.start == list.close.end
        && would_fuse(
            token_type_before(&stream, list.close.start),
            token_type_at(&stream, sibling.start),
        );
    let close_at = slurped_close_offset(&stream, sibling);
    let removed = TextEdit::replace(list.close, if needs_space { " " } else { "" });
    let inserted = TextEdit::insert(close_at, close_text(&stream, &list));
    log::trace!("forward slurp of {} over {}", list.outer(), sibling);

    let edits = vec![removed, inserted];
    if selection.is_caret() && selection.active == list.close.end {
        let caret = EditSelection::caret(sibling.end).map(&edits, Bias::Left);
        return checked_plan(&stream, edits, caret);
    }
    outcome(&stream, edits, selection, Bias::Left)
}

/// Move the opening bracket, with its prefixes, before the previous sibling
///
/// `foo (|bar)` becomes `(foo |bar)`.
#[must_use]
pub fn backward_slurp(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let Some(list) = target_list(&stream, selection.active) else {
        return EditOutcome::NotApplicable;
    };
    let Some(sibling) = sexp_before(&stream, list.outer_start) else {
        return EditOutcome::NotApplicable;
    };

    let needs_space = sibling.end == list.outer_start
        && would_fuse(
            token_type_before(&stream, sibling.end),
            token_type_at(&stream, list.open.end),
        );
    let inserted = TextEdit::insert(sibling.start, opener_text(&stream, &list));
    let removed = TextEdit::replace(list.opener(), if needs_space { " " } else { "" });
    outcome(&stream, vec![inserted, removed], selection, Bias::Right)
}

/// Move the closing bracket before the last child
///
/// `(foo |bar)` becomes `(foo) |bar`.
#[must_use]
pub fn forward_barf(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let Some(list) = target_list(&stream, selection.active) else {
        return EditOutcome::NotApplicable;
    };
    let Some(last) = sexp_before(&stream, list.close.start) else {
        return EditOutcome::NotApplicable;
    };
    if last.start < list.open.end {
        return EditOutcome::NotApplicable;
    }

    let mut cursor = stream.cursor_at(last.start);
    cursor.backward_whitespace(true);
    let target = cursor.offset().max(list.open.end);

    let inserted = TextEdit::insert(target, close_text(&stream, &list));
    let removed = TextEdit::delete(list.close);
    outcome(&stream, vec![inserted, removed], selection, Bias::Left)
}

/// Move the opening bracket, with its prefixes, after the first child
///
/// `(foo |bar)` becomes `foo (|bar)`.
#[must_use]
pub fn backward_barf(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let Some(list) = target_list(&stream, selection.active) else {
        return EditOutcome::NotApplicable;
    };
    let Some(first) = sexp_after(&stream, list.open.end) else {
        return EditOutcome::NotApplicable;
    };
    if first.end > list.close.start {
        return EditOutcome::NotApplicable;
    }

    let mut cursor = stream.cursor_at(first.end);
    cursor.forward_whitespace(true);
    let target = cursor.offset().min(list.close.start);

    let removed = TextEdit::delete(list.opener());
    let inserted = TextEdit::insert(target, opener_text(&stream, &list));
    outcome(&stream, vec![removed, inserted], selection, Bias::Right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::apply_edits;
    use pretty_assertions::assert_eq;

    fn run(
        op: fn(&str, EditSelection) -> EditOutcome,
        source: &str,
        caret: usize,
    ) -> Option<(String, usize)> {
        let plan = op(source, EditSelection::caret(caret)).into_plan()?;
        let text = apply_edits(source, &plan.edits).ok()?;
        Some((text, plan.selection.active))
    }

    #[test]
    fn forward_slurp_from_after_list() {
        assert_eq!(
            run(forward_slurp, "(foo) bar", 5),
            Some(("(foo bar)".to_string(), 8))
        );
    }

    #[test]
    fn forward_slurp_from_inside() {
        assert_eq!(
            run(forward_slurp, "(a (b) c d)", 5),
            Some(("(a (b c) d)".to_string(), 5))
        );
    }

    #[test]
    fn forward_slurp_pulls_whole_list() {
        assert_eq!(
            run(forward_slurp, "[a] (b c)", 1),
            Some(("[a (b c)]".to_string(), 1))
        );
    }

    #[test]
    fn forward_slurp_inserts_space_between_atoms() {
        assert_eq!(
            run(forward_slurp, "(a)b", 1),
            Some(("(a b)".to_string(), 1))
        );
    }

    #[test]
    fn forward_slurp_without_sibling_is_noop() {
        assert_eq!(
            forward_slurp("(a (b))", EditSelection::caret(4)),
            EditOutcome::NotApplicable
        );
        assert_eq!(
            forward_slurp("a b", EditSelection::caret(1)),
            EditOutcome::NotApplicable
        );
    }

    #[test]
    fn backward_slurp_moves_prefixed_opener() {
        assert_eq!(
            run(backward_slurp, "a #{b}", 4),
            Some(("#{a b}".to_string(), 4))
        );
    }

    #[test]
    fn backward_slurp_at_top_level_from_opener() {
        assert_eq!(
            run(backward_slurp, "foo (bar)", 4),
            Some(("(foo bar)".to_string(), 5))
        );
    }

    #[test]
    fn forward_barf_ejects_last_child() {
        assert_eq!(
            run(forward_barf, "(foo bar)", 1),
            Some(("(foo) bar".to_string(), 1))
        );
        assert_eq!(
            run(forward_barf, "(a)", 1),
            Some(("()a".to_string(), 1))
        );
        assert_eq!(
            forward_barf("()", EditSelection::caret(1)),
            EditOutcome::NotApplicable
        );
    }

    #[test]
    fn forward_barf_keeps_close_out_of_comments() {
        assert_eq!(
            run(forward_barf, "(a ;c\n b)", 1),
            Some(("(a) ;c\n b".to_string(), 1))
        );
    }

    #[test]
    fn backward_barf_ejects_first_child() {
        assert_eq!(
            run(backward_barf, "(foo bar)", 6),
            Some(("foo (bar)".to_string(), 6))
        );
        assert_eq!(
            run(backward_barf, "'(a b)", 3),
            Some(("a '(b)".to_string(), 1))
        );
    }

    #[test]
    fn slurp_then_barf_round_trips() {
        let source = "(a (b) c ;x\n d)";
        let (slurped, caret) = run(forward_slurp, source, 5).unwrap_or_default();
        assert_eq!(slurped, "(a (b c ;x\n) d)");
        let (barfed, _) = run(forward_barf, &slurped, caret).unwrap_or_default();
        assert_eq!(barfed, source);
    }

    #[test]
    fn backward_slurp_then_barf_round_trips() {
        let source = "(a b (c) d)";
        let (slurped, caret) = run(backward_slurp, source, 6).unwrap_or_default();
        assert_eq!(slurped, "(a (b c) d)");
        let (barfed, _) = run(backward_barf, &slurped, caret).unwrap_or_default();
        assert_eq!(barfed, source);
    }

    #[test]
    fn forward_slurp_caret_inside_stays_put() {
        assert_eq!(
            run(forward_slurp, "(foo) bar", 4),
            Some(("(foo bar)".to_string(), 4))
        );
    }

    #[test]
    fn forward_slurp_absorbs_trailing_comment() {
        assert_eq!(
            run(forward_slurp, "(foo) bar ; why\nbaz", 2),
            Some(("(foo bar ; why\n)baz".to_string(), 2))
        );
        assert_eq!(
            run(forward_slurp, "(foo) bar ; why", 2),
            Some(("(foo bar) ; why".to_string(), 2))
        );
        assert_eq!(
            run(forward_slurp, "(foo) bar\n; next", 2),
            Some(("(foo bar)\n; next".to_string(), 2))
        );
    }

    #[test]
    fn slurp_over_comment_then_barf_round_trips() {
        let source = "(a) b ;c\r\n d";
        let (slurped, caret) = run(forward_slurp, source, 1).unwrap_or_default();
        assert_eq!(slurped, "(a b ;c\r\n) d");
        let (barfed, _) = run(forward_barf, &slurped, caret).unwrap_or_default();
        assert_eq!(barfed, source);
    }
}
