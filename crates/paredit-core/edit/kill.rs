//! Kill to list or sexp boundaries
//!
//! Kills never remove a bracket. Inside a string or comment they stop at the
//! token's delimiters instead of the list's.

use crate::cursor::TokenStream;
use crate::utils::Span;

use super::{checked_plan, EditOutcome, EditPlan, EditSelection, TextEdit};

/// Delete `span`, leaving the caret at its start
fn kill(stream: &TokenStream<'_>, span: Span) -> EditOutcome {
    if span.is_empty() {
        return EditOutcome::NotApplicable;
    }
    log::trace!("kill {span}");
    checked_plan(
        stream,
        vec![TextEdit::delete(span)],
        EditSelection::caret(span.start),
    )
}

/// Range a forward kill from `caret` may reach
fn forward_limit(stream: &TokenStream<'_>, caret: usize) -> Option<usize> {
    let cursor = stream.cursor_at(caret);
    if let Some(token) = cursor.opaque_token() {
        return token.interior().map(|inner| inner.end);
    }
    cursor.enclosing_list().map(|list| list.close.start)
}

/// Range a backward kill to `caret` may reach
fn backward_limit(stream: &TokenStream<'_>, caret: usize) -> Option<usize> {
    let cursor = stream.cursor_at(caret);
    if let Some(token) = cursor.opaque_token() {
        return token.interior().map(|inner| inner.start);
    }
    cursor.enclosing_list().map(|list| list.open.end)
}

/// Delete from the caret to the end of the enclosing list
///
/// `(a |b c)` becomes `(a |)`.
#[must_use]
pub fn kill_forward_list(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    match forward_limit(&stream, caret) {
        Some(end) if end > caret => kill(&stream, Span::new(caret, end)),
        _ => EditOutcome::NotApplicable,
    }
}

/// Delete from the start of the enclosing list to the caret
///
/// `(a b| c)` becomes `(| c)`.
#[must_use]
pub fn kill_backward_list(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    match backward_limit(&stream, caret) {
        Some(start) if start < caret => kill(&stream, Span::new(start, caret)),
        _ => EditOutcome::NotApplicable,
    }
}

/// Delete from the caret through the next sexp
///
/// `(a| b c)` becomes `(a| c)`.
#[must_use]
pub fn kill_sexp_forward(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let cursor = stream.cursor_at(caret);
    if cursor.opaque_token().is_some() {
        return kill_forward_list(source, selection);
    }
    let mut end = cursor;
    if !end.forward_sexp() {
        return EditOutcome::NotApplicable;
    }
    kill(&stream, Span::new(caret, end.offset()))
}

/// Delete from the start of the previous sexp to the caret
///
/// `(a b |c)` becomes `(a |c)`.
#[must_use]
pub fn kill_sexp_backward(source: &str, selection: EditSelection) -> EditOutcome {
    let stream = TokenStream::new(source);
    let caret = selection.active;
    let cursor = stream.cursor_at(caret);
    if cursor.opaque_token().is_some() {
        return kill_backward_list(source, selection);
    }
    let mut start = cursor;
    if !start.backward_sexp() {
        return EditOutcome::NotApplicable;
    }
    kill(&stream, Span::new(start.offset(), caret))
}

/// Delete `span` and return the deleted text alongside the plan
///
/// Used by cut commands. Refused like any other edit when it would unbalance
/// a balanced buffer.
#[must_use]
pub fn cut_span(source: &str, span: Span) -> Option<(EditPlan, String)> {
    let stream = TokenStream::new(source);
    let text = span.slice(source)?.to_string();
    kill(&stream, span).into_plan().map(|plan| (plan, text))
}
