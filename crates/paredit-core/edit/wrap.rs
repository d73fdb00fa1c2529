//! Wrap a form or the selection in a new pair of brackets

use crate::cursor::TokenStream;
use crate::navigation::range_for_current_sexp;
use crate::utils::Span;

use super::{checked_plan, EditOutcome, EditSelection, TextEdit};

/// Form the caret wraps: the current sexp, nothing inside a comment
fn wrap_target(stream: &TokenStream<'_>, caret: usize) -> Option<Span> {
    if stream.cursor_at(caret).within_comment() {
        return None;
    }
    range_for_current_sexp(stream, caret)
}

/// Surround the selection, or the form at the caret, with `open` and `close`
///
/// The caret lands just inside `open`. A caret right after a form wraps that
/// form: `(a b|)` becomes `(a (|b))`. With no form at the caret, an empty pair
/// is inserted there.
#[must_use]
pub fn wrap_around(source: &str, selection: EditSelection, open: &str, close: &str) -> EditOutcome {
    let stream = TokenStream::new(source);
    let range = if selection.is_caret() {
        wrap_target(&stream, selection.active).unwrap_or_else(|| Span::empty(selection.active))
    } else {
        selection.span()
    };
    if range.end > source.len() {
        return EditOutcome::NotApplicable;
    }
    let edits = if range.is_empty() {
        vec![TextEdit::insert(range.start, format!("{open}{close}"))]
    } else {
        vec![
            TextEdit::insert(range.start, open),
            TextEdit::insert(range.end, close),
        ]
    };
    checked_plan(&stream, edits, EditSelection::caret(range.start + open.len()))
}
