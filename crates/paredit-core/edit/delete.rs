//! Balanced character deletion and closing-bracket insertion
//!
//! In [`PareditMode::Strict`] a bracket whose partner is present is never
//! deleted alone, and no deletion may add unmatched brackets, even in a
//! buffer that is already unbalanced. Empty pairs (`()`, `[]`, `{}`, `""`) are deleted as a
//! unit, escape sequences in strings are deleted whole, and deleting over a
//! closing bracket steps the caret inside the list instead. In
//! [`PareditMode::Original`] characters are deleted verbatim.

use crate::cursor::{TokenCursor, TokenStream};
use crate::tokenizer::{DelimiterType, Token, TokenType};
use crate::utils::Span;

use super::{apply_edits, checked_plan, EditOutcome, EditPlan, EditSelection, PareditMode, TextEdit};

/// Whether `span` is exactly one bracket whose partner is present
fn is_paired_bracket(stream: &TokenStream<'_>, span: Span) -> bool {
    let Some(token) = stream
        .cursor_at(span.start)
        .token()
        .filter(|token| token.range() == span)
    else {
        return false;
    };
    match token.token_type {
        TokenType::Open(_) => stream
            .cursor_at(token.end())
            .enclosing_list()
            .is_some_and(|list| list.open == span),
        TokenType::Close(_) => stream
            .cursor_at(token.offset)
            .enclosing_list()
            .is_some_and(|list| list.close == span),
        _ => false,
    }
}

fn delete_span(stream: &TokenStream<'_>, span: Span, mode: PareditMode) -> EditOutcome {
    if span.is_empty() {
        return EditOutcome::NotApplicable;
    }
    let edits = vec![TextEdit::delete(span)];
    let selection = EditSelection::caret(span.start);
    match mode {
        PareditMode::Strict if is_paired_bracket(stream, span) => EditOutcome::NotApplicable,
        PareditMode::Strict => checked_plan(stream, edits, selection),
        PareditMode::Original => EditOutcome::Edits(EditPlan::new(edits, selection)),
    }
}

fn prev_char_span(source: &str, offset: usize) -> Option<Span> {
    let ch = source.get(..offset)?.chars().next_back()?;
    Some(Span::new(offset - ch.len_utf8(), offset))
}

fn next_char_span(source: &str, offset: usize) -> Option<Span> {
    let ch = source.get(offset..)?.chars().next()?;
    Some(Span::new(offset, offset + ch.len_utf8()))
}

fn is_empty_string(token: &Token<'_>) -> bool {
    token.is_string()
        && token.is_terminated()
        && token.interior().is_some_and(|inner| inner.is_empty())
}

/// Empty list or string whose interior is exactly at the cursor
fn empty_pair_around(cursor: &TokenCursor<'_>) -> Option<Span> {
    if let Some(token) = cursor.opaque_token() {
        return is_empty_string(&token).then(|| token.range());
    }
    cursor
        .enclosing_list()
        .filter(|list| list.inner().is_empty())
        .map(|list| list.outer())
}

/// Empty list or string ending exactly at the cursor
fn empty_pair_before(stream: &TokenStream<'_>, cursor: &TokenCursor<'_>) -> Option<Span> {
    if cursor.is_interior() {
        return None;
    }
    let token = cursor.prev_token()?;
    match token.token_type {
        TokenType::String if is_empty_string(&token) => Some(token.range()),
        TokenType::Close(_) => stream
            .cursor_at(token.offset)
            .enclosing_list()
            .filter(|list| list.inner().is_empty())
            .map(|list| list.outer()),
        _ => None,
    }
}

/// Empty list or string starting exactly at the cursor
fn empty_pair_after(stream: &TokenStream<'_>, cursor: &TokenCursor<'_>) -> Option<Span> {
    if cursor.is_interior() {
        return None;
    }
    let token = cursor.token()?;
    match token.token_type {
        TokenType::String if is_empty_string(&token) => Some(token.range()),
        TokenType::Open(_) => stream
            .cursor_at(token.end())
            .enclosing_list()
            .filter(|list| list.inner().is_empty())
            .map(|list| Span::new(list.open.start, list.close.end)),
        _ => None,
    }
}

/// Escape sequences of a string token, as byte ranges
fn escape_units<'a>(token: &Token<'a>) -> impl Iterator<Item = Span> + 'a {
    let body_start = token.open_len();
    let mut chars = token.span[body_start..].char_indices().peekable();
    let base = token.offset + body_start;
    core::iter::from_fn(move || loop {
        let (index, ch) = chars.next()?;
        if ch != '\\' {
            continue;
        }
        let width = chars.next().map_or(0, |(_, escaped)| escaped.len_utf8());
        return Some(Span::new(base + index, base + index + 1 + width));
    })
}

/// Escape sequence in the string around the cursor that touches `offset`
fn escape_unit(cursor: &TokenCursor<'_>, touches: impl Fn(Span) -> bool) -> Option<Span> {
    let token = cursor.opaque_token().filter(Token::is_string)?;
    let interior = token.interior()?;
    escape_units(&token)
        .filter(|unit| interior.encloses(*unit))
        .find(|unit| touches(*unit))
}

/// Delete backward from the caret, or delete the selection
#[must_use]
pub fn delete_backward(source: &str, selection: EditSelection, mode: PareditMode) -> EditOutcome {
    let stream = TokenStream::new(source);
    if !selection.is_caret() {
        return delete_span(&stream, selection.span(), mode);
    }
    let caret = selection.active;
    let Some(char_span) = prev_char_span(source, caret) else {
        return EditOutcome::NotApplicable;
    };
    if mode == PareditMode::Original {
        return delete_span(&stream, char_span, mode);
    }

    let cursor = stream.cursor_at(caret);
    let candidate = empty_pair_around(&cursor)
        .or_else(|| empty_pair_before(&stream, &cursor))
        .or_else(|| escape_unit(&cursor, |unit| unit.start < caret && caret <= unit.end))
        .unwrap_or(char_span);

    match delete_span(&stream, candidate, mode) {
        EditOutcome::NotApplicable => step_backward_into(&cursor, caret),
        outcome => outcome,
    }
}

/// Refused backspace over a closing delimiter moves the caret inside
fn step_backward_into(cursor: &TokenCursor<'_>, caret: usize) -> EditOutcome {
    if cursor.is_interior() {
        return EditOutcome::NotApplicable;
    }
    match cursor.prev_token() {
        Some(token) if token.is_close() => {
            EditOutcome::Edits(EditPlan::select(EditSelection::caret(token.offset)))
        }
        Some(token) if token.is_string() && token.close_len() > 0 => EditOutcome::Edits(
            EditPlan::select(EditSelection::caret(caret - token.close_len())),
        ),
        _ => EditOutcome::NotApplicable,
    }
}

/// Delete forward from the caret, or delete the selection
#[must_use]
pub fn delete_forward(source: &str, selection: EditSelection, mode: PareditMode) -> EditOutcome {
    let stream = TokenStream::new(source);
    if !selection.is_caret() {
        return delete_span(&stream, selection.span(), mode);
    }
    let caret = selection.active;
    let Some(char_span) = next_char_span(source, caret) else {
        return EditOutcome::NotApplicable;
    };
    if mode == PareditMode::Original {
        return delete_span(&stream, char_span, mode);
    }

    let cursor = stream.cursor_at(caret);
    let candidate = empty_pair_around(&cursor)
        .or_else(|| empty_pair_after(&stream, &cursor))
        .or_else(|| escape_unit(&cursor, |unit| unit.start <= caret && caret < unit.end))
        .unwrap_or(char_span);

    match delete_span(&stream, candidate, mode) {
        EditOutcome::NotApplicable => step_forward_into(&cursor),
        outcome => outcome,
    }
}

/// Refused delete over an opening delimiter moves the caret inside
fn step_forward_into(cursor: &TokenCursor<'_>) -> EditOutcome {
    if cursor.is_interior() {
        return EditOutcome::NotApplicable;
    }
    match cursor.token() {
        Some(token) if token.is_open() || token.is_string() => {
            let inside = if token.is_open() {
                token.end()
            } else {
                token.offset + token.open_len()
            };
            EditOutcome::Edits(EditPlan::select(EditSelection::caret(inside)))
        }
        _ => EditOutcome::NotApplicable,
    }
}

/// Handle a typed closing bracket `ch` at `caret`
///
/// Inside a string or comment the character is inserted. Otherwise, if the
/// next non-whitespace token is the same kind of closing bracket, the caret
/// moves past it. A balanced buffer is left alone; an unbalanced one gets
/// the character.
#[must_use]
pub fn close(source: &str, caret: usize, ch: char) -> EditOutcome {
    let Some(kind) = DelimiterType::from_close(ch) else {
        return EditOutcome::NotApplicable;
    };
    let stream = TokenStream::new(source);
    let cursor = stream.cursor_at(caret);
    let insert = || {
        EditOutcome::Edits(EditPlan::new(
            vec![TextEdit::insert(caret, ch.to_string())],
            EditSelection::caret(caret + ch.len_utf8()),
        ))
    };

    if cursor.within_string() || cursor.within_comment() {
        return insert();
    }
    let mut next = cursor;
    next.forward_whitespace(false);
    if let Some(token) = next.token() {
        if token.token_type == TokenType::Close(kind) {
            return EditOutcome::Edits(EditPlan::select(EditSelection::caret(token.end())));
        }
    }
    if stream.is_balanced() {
        EditOutcome::NotApplicable
    } else {
        insert()
    }
}

fn applied(source: &str, outcome: EditOutcome, fallback: EditSelection) -> Option<(String, EditSelection)> {
    match outcome {
        EditOutcome::Edits(plan) => {
            let text = apply_edits(source, &plan.edits).ok()?;
            Some((text, plan.selection))
        }
        EditOutcome::NotApplicable => Some((source.to_string(), fallback)),
    }
}

/// Remove the just-typed character before `caret` unless that adds unmatched brackets
fn remove_typed(source: &str, caret: usize) -> EditOutcome {
    let Some(span) = prev_char_span(source, caret) else {
        return EditOutcome::NotApplicable;
    };
    let stream = TokenStream::new(source);
    checked_plan(&stream, vec![TextEdit::delete(span)], EditSelection::caret(span.start))
}

/// Removal of the typed bracket followed by [`close`], as one edit against `source`
///
/// Meant for a host that has already inserted the typed closing bracket just
/// before `caret`: a duplicate bracket is removed and the caret skips over the
/// existing one, while a bracket that genuinely closes a list is kept.
#[must_use]
pub fn backspace_then_close(source: &str, caret: usize, ch: char) -> EditOutcome {
    let start = EditSelection::caret(caret);
    let Some((after_delete, selection)) = applied(source, remove_typed(source, caret), start)
    else {
        return EditOutcome::NotApplicable;
    };
    let Some((after_close, selection)) = applied(
        &after_delete,
        close(&after_delete, selection.active, ch),
        selection,
    ) else {
        return EditOutcome::NotApplicable;
    };
    let edits = TextEdit::diff(source, &after_close).into_iter().collect();
    EditOutcome::Edits(EditPlan::new(edits, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn backspace(source: &str, caret: usize) -> Option<(String, usize)> {
        let plan = delete_backward(source, EditSelection::caret(caret), PareditMode::Strict)
            .into_plan()?;
        Some((apply_edits(source, &plan.edits).ok()?, plan.selection.active))
    }

    fn delete(source: &str, caret: usize) -> Option<(String, usize)> {
        let plan = delete_forward(source, EditSelection::caret(caret), PareditMode::Strict)
            .into_plan()?;
        Some((apply_edits(source, &plan.edits).ok()?, plan.selection.active))
    }

    #[test]
    fn backspace_after_open_is_refused() {
        assert_eq!(backspace("(a b)", 1), None);
    }

    #[test]
    fn unbalanced_buffer_keeps_paired_brackets() {
        assert_eq!(backspace("(a b))", 1), None);
        assert_eq!(delete("(a b))", 0), Some(("(a b))".to_string(), 1)));
        assert_eq!(backspace("((a b)", 2), None);
        assert_eq!(backspace("(a b))", 6), Some(("(a b)".to_string(), 5)));
        assert_eq!(backspace("(a bc))", 5), Some(("(a b))".to_string(), 4)));
    }

    #[test]
    fn backspace_inside_empty_pair_deletes_both() {
        assert_eq!(backspace("()", 1), Some((String::new(), 0)));
        assert_eq!(backspace("(a [])", 4), Some(("(a )".to_string(), 3)));
        assert_eq!(backspace("x \"\"", 3), Some(("x ".to_string(), 2)));
    }

    #[test]
    fn backspace_after_empty_pair_deletes_both() {
        assert_eq!(backspace("(a #{})", 6), Some(("(a )".to_string(), 3)));
        assert_eq!(backspace("\"\"", 2), Some((String::new(), 0)));
    }

    #[test]
    fn backspace_over_close_steps_inside() {
        assert_eq!(backspace("(a b)", 5), Some(("(a b)".to_string(), 4)));
        assert_eq!(backspace("\"ab\"", 4), Some(("\"ab\"".to_string(), 3)));
    }

    #[test]
    fn backspace_plain_character() {
        assert_eq!(backspace("(ab)", 3), Some(("(a)".to_string(), 2)));
        assert_eq!(backspace("(λ)", 3), Some(("()".to_string(), 1)));
    }

    #[test]
    fn backspace_removes_escape_whole() {
        assert_eq!(
            backspace("\"a\\\"b\"", 4),
            Some(("\"ab\"".to_string(), 2))
        );
        assert_eq!(
            backspace("\"a\\\"b\"", 3),
            Some(("\"ab\"".to_string(), 2))
        );
    }

    #[test]
    fn backspace_keeps_comment_newline() {
        assert_eq!(backspace("(a ;c\n)", 6), None);
    }

    #[test]
    fn backspace_at_start_is_noop() {
        assert_eq!(backspace("(a)", 0), None);
    }

    #[test]
    fn original_mode_deletes_raw() {
        let plan = delete_backward("(a b)", EditSelection::caret(1), PareditMode::Original)
            .into_plan();
        assert_eq!(
            plan.map(|plan| plan.edits),
            Some(vec![TextEdit::delete(Span::new(0, 1))])
        );
    }

    #[test]
    fn selection_delete_checks_balance() {
        let refused = delete_backward("(a b)", EditSelection::new(0, 2), PareditMode::Strict);
        assert_eq!(refused, EditOutcome::NotApplicable);
        let accepted = delete_forward("(a b) c", EditSelection::new(5, 0), PareditMode::Strict);
        assert_eq!(
            accepted.into_plan().map(|plan| plan.edits),
            Some(vec![TextEdit::delete(Span::new(0, 5))])
        );
    }

    #[test]
    fn delete_forward_variants() {
        assert_eq!(delete("()", 1), Some((String::new(), 0)));
        assert_eq!(delete("a ()", 2), Some(("a ".to_string(), 2)));
        assert_eq!(delete("(ab)", 1), Some(("(b)".to_string(), 1)));
        assert_eq!(delete("(a b)", 0), Some(("(a b)".to_string(), 1)));
        assert_eq!(delete("x \"a\"", 2), Some(("x \"a\"".to_string(), 3)));
        assert_eq!(delete("(a)", 2), None);
    }

    #[test]
    fn close_moves_past_existing_bracket() {
        let plan = close("(a b  )", 4, ')').into_plan();
        assert_eq!(plan.map(|p| (p.edits.len(), p.selection.active)), Some((0, 7)));
    }

    #[test]
    fn close_in_balanced_buffer_is_noop() {
        assert_eq!(close("(a (b) c)", 7, ')'), EditOutcome::NotApplicable);
    }

    #[test]
    fn close_inserts_when_unbalanced_or_in_string() {
        let plan = close("(a b", 4, ')').into_plan();
        assert_eq!(
            plan.map(|p| p.edits),
            Some(vec![TextEdit::insert(4, ")")])
        );
        let plan = close("\"a\"", 2, ']').into_plan();
        assert_eq!(plan.map(|p| p.selection.active), Some(3));
    }

    #[test]
    fn typed_duplicate_close_is_skipped_over() {
        let plan = backspace_then_close("(a b))", 5, ')').into_plan();
        assert_eq!(
            plan.map(|p| (p.edits, p.selection.active)),
            Some((vec![TextEdit::delete(Span::new(5, 6))], 5))
        );
    }

    #[test]
    fn typed_close_that_balances_is_kept() {
        let plan = backspace_then_close("(a b)", 5, ')').into_plan();
        assert_eq!(
            plan.map(|p| (p.edits, p.selection.active)),
            Some((Vec::new(), 5))
        );
    }
}
