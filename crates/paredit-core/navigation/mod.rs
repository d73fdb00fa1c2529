//! Offset-level structural navigation
//!
//! Thin functions over [`TokenCursor`] that answer "which form is here" for a
//! byte offset or span: the current sexp, the smallest enclosing form, the
//! top-level defun, and the targets of the sexp motions.
//!
//! # Example
//!
//! ```rust
//! use paredit_core::cursor::TokenStream;
//! use paredit_core::navigation::{range_for_current_sexp, range_for_enclosing_form};
//! use paredit_core::utils::Span;
//!
//! let stream = TokenStream::new("(+ 1 (* 2 3))");
//! let atom = range_for_current_sexp(&stream, 8);
//! assert_eq!(atom, Some(Span::new(8, 9)));
//! assert_eq!(range_for_enclosing_form(&stream, Span::new(8, 9)), Some(Span::new(5, 12)));
//! ```

pub mod selection;

pub use selection::ExpansionStack;

use crate::cursor::{TokenCursor, TokenStream};
use crate::tokenizer::TokenType;
use crate::utils::Span;

/// Range of the sexp starting at the cursor, including prefixes
fn sexp_forward_from(cursor: TokenCursor<'_>, stream: &TokenStream<'_>) -> Option<Span> {
    let mut end = cursor;
    if !end.forward_sexp() {
        return None;
    }
    let mut start = stream.cursor_at(end.offset());
    if !start.backward_sexp() {
        return None;
    }
    Some(Span::new(start.offset(), end.offset()))
}

/// Range of the sexp ending at the cursor, including prefixes
fn sexp_backward_from(cursor: TokenCursor<'_>, stream: &TokenStream<'_>) -> Option<Span> {
    let mut start = cursor;
    if !start.backward_sexp() {
        return None;
    }
    let mut end = stream.cursor_at(start.offset());
    if !end.forward_sexp() {
        return None;
    }
    Some(Span::new(start.offset(), end.offset()))
}

/// Sexp starting at `offset` (after whitespace and comments), with prefixes
#[must_use]
pub fn sexp_after(stream: &TokenStream<'_>, offset: usize) -> Option<Span> {
    sexp_forward_from(stream.cursor_at(offset), stream)
}

/// Sexp ending at `offset` (before whitespace and comments), with prefixes
#[must_use]
pub fn sexp_before(stream: &TokenStream<'_>, offset: usize) -> Option<Span> {
    sexp_backward_from(stream.cursor_at(offset), stream)
}

/// Atom or string containing the offset in its interior, with prefixes
fn containing_token_range(stream: &TokenStream<'_>, offset: usize) -> Option<Span> {
    let cursor = stream.cursor_at(offset);
    if !cursor.is_interior() {
        return None;
    }
    let token = cursor.token()?;
    if !matches!(token.token_type, TokenType::Atom | TokenType::String) {
        return None;
    }
    sexp_backward_from(stream.cursor_at(token.end()), stream)
}

/// Range of the sexp at `offset`
///
/// In priority order: the atom or string the offset is inside of, the sexp
/// starting at the offset, the sexp ending at the offset, the enclosing list.
/// Returns `None` only at top level with no adjacent form.
#[must_use]
pub fn range_for_current_sexp(stream: &TokenStream<'_>, offset: usize) -> Option<Span> {
    if let Some(range) = containing_token_range(stream, offset) {
        return Some(range);
    }

    let cursor = stream.cursor_at(offset);
    if !cursor.is_interior() {
        let starts_form = cursor
            .token()
            .is_some_and(|token| !token.is_trivia(true) && !token.is_close());
        if starts_form {
            if let Some(range) = sexp_forward_from(cursor, stream) {
                return Some(range);
            }
        }
        let ends_form = cursor
            .prev_token()
            .is_some_and(|token| !token.is_trivia(true) && !token.is_open());
        if ends_form {
            if let Some(range) = sexp_backward_from(cursor, stream) {
                return Some(range);
            }
        }
    }

    cursor.enclosing_list().map(|list| list.outer())
}

/// Smallest form that strictly contains `span`
///
/// Candidates are the atom or string around the span, the sexps starting at
/// its start and ending at its end, and each enclosing list outward.
#[must_use]
pub fn range_for_enclosing_form(stream: &TokenStream<'_>, span: Span) -> Option<Span> {
    let mut candidates: Vec<Span> = Vec::with_capacity(4);

    if let Some(range) = containing_token_range(stream, span.start) {
        candidates.push(range);
    }
    let at_start = stream.cursor_at(span.start);
    if !at_start.is_interior() {
        if let Some(range) = sexp_forward_from(at_start, stream) {
            candidates.push(range);
        }
    }
    let at_end = stream.cursor_at(span.end);
    if !at_end.is_interior() {
        if let Some(range) = sexp_backward_from(at_end, stream) {
            candidates.push(range);
        }
    }

    let mut cursor = at_start;
    while let Some(list) = cursor.enclosing_list() {
        let outer = list.outer();
        if outer.strictly_encloses(span) {
            candidates.push(outer);
            break;
        }
        cursor = stream.cursor_at(list.outer_start);
    }

    candidates
        .into_iter()
        .filter(|candidate| candidate.strictly_encloses(span))
        .min_by_key(Span::len)
}

/// Top-level form around `offset`, or the form adjacent to it at top level
#[must_use]
pub fn range_for_defun(stream: &TokenStream<'_>, offset: usize) -> Option<Span> {
    let mut cursor = stream.cursor_at(offset);
    let mut climbed = false;
    while cursor.backward_up_sexp() {
        climbed = true;
    }
    if climbed {
        sexp_forward_from(cursor, stream)
    } else {
        range_for_current_sexp(stream, offset)
    }
}

/// Cursor motions exposed as editor commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Motion {
    /// Past the next sibling
    ForwardSexp,
    /// Before the previous sibling
    BackwardSexp,
    /// Into the next list
    ForwardDownSexp,
    /// Into the previous list, at its end
    BackwardDownSexp,
    /// Past the enclosing close
    ForwardUpSexp,
    /// Before the enclosing open
    BackwardUpSexp,
    /// Just before the enclosing close
    CloseList,
    /// The whole top-level form
    RangeForDefun,
}

impl Motion {
    /// All motions in declaration order
    pub const ALL: [Self; 8] = [
        Self::ForwardSexp,
        Self::BackwardSexp,
        Self::ForwardDownSexp,
        Self::BackwardDownSexp,
        Self::ForwardUpSexp,
        Self::BackwardUpSexp,
        Self::CloseList,
        Self::RangeForDefun,
    ];
}

/// Where a motion leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionTarget {
    /// Caret destination
    Point(usize),
    /// Range to select
    Range(Span),
}

impl MotionTarget {
    /// Text range between `from` and the target
    #[must_use]
    pub fn span_from(self, from: usize) -> Span {
        match self {
            Self::Point(to) => Span::new(from, to),
            Self::Range(range) => range,
        }
    }
}

/// Target of `motion` from `offset`, `None` when the motion is impossible
#[must_use]
pub fn motion_target(stream: &TokenStream<'_>, offset: usize, motion: Motion) -> Option<MotionTarget> {
    let mut cursor = stream.cursor_at(offset);
    let moved = match motion {
        Motion::ForwardSexp => cursor.forward_sexp(),
        Motion::BackwardSexp => cursor.backward_sexp(),
        Motion::ForwardDownSexp => cursor.forward_down_sexp(),
        Motion::BackwardDownSexp => cursor.backward_down_sexp(),
        Motion::ForwardUpSexp => cursor.forward_up_sexp(),
        Motion::BackwardUpSexp => cursor.backward_up_sexp(),
        Motion::CloseList => cursor.forward_list(),
        Motion::RangeForDefun => {
            return range_for_defun(stream, offset).map(MotionTarget::Range);
        }
    };
    moved.then(|| MotionTarget::Point(cursor.offset()))
}
