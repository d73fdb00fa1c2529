//! Splice, splice-killing, raise, convolute and split
//!
//! All of these rewrite the brackets of the innermost list around the caret.

use crate::cursor::TokenStream;
use crate::navigation::range_for_current_sexp;
use crate::utils::Span;

use super::{
    checked_plan, whitespace_end_after, whitespace_start_before, Bias, EditOutcome,
    EditSelection, TextEdit,
};

/// Remove the brackets of the enclosing list
///
/// `(a (b| c) d)` becomes `(a b| c d)`.
#[must_use]
pub fn splice(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let Some(list) = stream.cursor_at(selection.active).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };
    let edits = vec![TextEdit::delete(list.opener()), TextEdit::delete(list.close)];
    let selection = selection.map(&edits, Bias::Left);
    checked_plan(&stream, edits, selection)
}

/// Kill start for a caret: the caret itself, or the end of the token it is inside
fn kill_from(stream: &TokenStream<'_>, caret: usize) -> usize {
    let cursor = stream.cursor_at(caret);
    match cursor.token() {
        Some(token) if cursor.is_interior() && !token.is_whitespace() => token.end(),
        _ => caret,
    }
}

/// Kill end for a caret: the caret itself, or the start of the token it is inside
fn kill_to(stream: &TokenStream<'_>, caret: usize) -> usize {
    let cursor = stream.cursor_at(caret);
    match cursor.token() {
        Some(token) if cursor.is_interior() && !token.is_whitespace() => token.offset,
        _ => caret,
    }
}

/// Splice the enclosing list, killing everything after the caret
///
/// `(a (b |c d))` becomes `(a b)`.
#[must_use]
pub fn splice_killing_forward(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let Some(list) = stream.cursor_at(caret).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };
    let start = whitespace_start_before(&stream, kill_from(&stream, caret)).max(list.open.end);
    let edits = vec![
        TextEdit::delete(list.opener()),
        TextEdit::delete(Span::new(start, list.close.end)),
    ];
    let selection = EditSelection::caret(caret.min(start)).map(&edits, Bias::Left);
    checked_plan(&stream, edits, selection)
}

/// Splice the enclosing list, killing everything before the caret
///
/// `(a (b c| d))` becomes `(a |d)`.
#[must_use]
pub fn splice_killing_backward(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let Some(list) = stream.cursor_at(caret).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };
    let end = whitespace_end_after(&stream, kill_to(&stream, caret)).min(list.close.start);
    let edits = vec![
        TextEdit::delete(Span::new(list.outer_start, end)),
        TextEdit::delete(list.close),
    ];
    let selection = EditSelection::caret(list.outer_start);
    checked_plan(&stream, edits, selection)
}

/// Replace the enclosing list with the current sexp, or with the selection
///
/// `(a (b |c) d)` becomes `(a |c d)`. The caret keeps its place inside the
/// raised form.
#[must_use]
pub fn raise(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let Some(list) = stream.cursor_at(caret).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };
    let form = if selection.is_caret() {
        match range_for_current_sexp(&stream, caret) {
            Some(form) => form,
            None => return EditOutcome::NotApplicable,
        }
    } else {
        selection.span()
    };
    if form.is_empty() || !list.inner().encloses(form) {
        return EditOutcome::NotApplicable;
    }

    let Some(text) = form.slice(source) else {
        return EditOutcome::NotApplicable;
    };
    let edits = vec![TextEdit::replace(list.outer(), text)];
    let relocate =
        |offset: usize| list.outer_start + offset.clamp(form.start, form.end) - form.start;
    let selection = EditSelection::new(relocate(selection.anchor), relocate(selection.active));
    checked_plan(&stream, edits, selection)
}

/// Swap the nesting of the two innermost lists
///
/// The inner list's head (its opener and the sexps before the caret) moves to
/// wrap the outer list: `(let [x 1] (foo |(bar x)))` becomes
/// `(foo (let [x 1] |(bar x)))`.
#[must_use]
pub fn convolute(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let cursor = stream.cursor_at(selection.active);
    if cursor.within_string() || cursor.within_comment() {
        return EditOutcome::NotApplicable;
    }
    let point = kill_to(&stream, selection.active);
    let Some(inner) = stream.cursor_at(point).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };
    let Some(outer) = stream.cursor_at(inner.outer_start).enclosing_list() else {
        return EditOutcome::NotApplicable;
    };

    let head = Span::new(inner.open.end, point);
    let Some(head_text) = head.slice(source) else {
        return EditOutcome::NotApplicable;
    };
    let opener = &source[inner.outer_start..inner.open.end];
    let close = &source[inner.close.start..inner.close.end];

    let edits = vec![
        TextEdit::insert(outer.outer_start, format!("{opener}{head_text}")),
        TextEdit::delete(Span::new(inner.outer_start, point)),
        TextEdit::delete(inner.close),
        TextEdit::insert(outer.close.end, close),
    ];
    let selection = EditSelection::caret(point).map(&edits, Bias::Left);
    checked_plan(&stream, edits, selection)
}

/// Split the enclosing list or string in two at the caret
///
/// `(a |b)` becomes `(a)| (b)`; `"ab|cd"` becomes `"ab"| "cd"`.
#[must_use]
pub fn split(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let cursor = stream.cursor_at(caret);

    if cursor.within_string() {
        let Some(string) = cursor.opaque_token() else {
            return EditOutcome::NotApplicable;
        };
        let opener = &string.span[..string.open_len()];
        let edits = vec![TextEdit::insert(caret, format!("\" {opener}"))];
        return checked_plan(&stream, edits, EditSelection::caret(caret + 1));
    }
    if cursor.within_comment() {
        return EditOutcome::NotApplicable;
    }
    if cursor.is_interior() && cursor.token().is_some_and(|token| !token.is_whitespace()) {
        return EditOutcome::NotApplicable;
    }
    let Some(list) = cursor.enclosing_list() else {
        return EditOutcome::NotApplicable;
    };

    let close = &source[list.close.start..list.close.end];
    let opener = &source[list.outer_start..list.open.end];
    let before = whitespace_start_before(&stream, caret).max(list.open.end);
    let after = whitespace_end_after(&stream, caret).min(list.close.start);

    let edits = if before == after {
        vec![TextEdit::insert(before, format!("{close} {opener}"))]
    } else {
        vec![
            TextEdit::insert(before, close),
            TextEdit::insert(after, opener),
        ]
    };
    checked_plan(&stream, edits, EditSelection::caret(before + close.len()))
}
