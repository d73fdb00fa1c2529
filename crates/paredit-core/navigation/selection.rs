//! Grow/shrink selection history
//!
//! Growing pushes the previous selection so that shrinking can restore it.
//! The stack is only trusted while its top still equals the live selection;
//! any other selection change makes the next grow start a fresh history.
//! Selections are kept with their direction, so the last shrink gives back
//! the starting selection exactly, anchor and active end included.

use crate::cursor::TokenStream;
use crate::edit::EditSelection;

use super::{range_for_current_sexp, range_for_enclosing_form};

/// Stack of selections visited by successive grows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionStack {
    selections: Vec<EditSelection>,
}

impl ExpansionStack {
    /// Create an empty history
    #[must_use]
    pub const fn new() -> Self {
        Self {
            selections: Vec::new(),
        }
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.selections.clear();
    }

    /// Number of remembered selections
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Check if no history is remembered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Most recent selection
    #[must_use]
    pub fn top(&self) -> Option<EditSelection> {
        self.selections.last().copied()
    }

    /// Grow `current` to the next enclosing form
    ///
    /// A caret grows to the sexp at the caret; a range grows to the smallest
    /// form strictly containing it. The grown selection is active at its end.
    /// Returns `None`, leaving the history untouched, when nothing larger
    /// exists.
    pub fn grow(&mut self, stream: &TokenStream<'_>, current: EditSelection) -> Option<EditSelection> {
        let span = current.span();
        let next = if current.is_caret() {
            range_for_current_sexp(stream, current.active)
        } else {
            range_for_enclosing_form(stream, span)
        }?;
        if next == span {
            return None;
        }
        let next = EditSelection::from_span(next);
        if self.top() != Some(current) {
            self.selections.clear();
            self.selections.push(current);
        }
        self.selections.push(next);
        Some(next)
    }

    /// Undo the last grow, if `current` is the selection it produced
    pub fn shrink(&mut self, current: EditSelection) -> Option<EditSelection> {
        if self.selections.len() < 2 || self.top() != Some(current) {
            return None;
        }
        self.selections.pop();
        self.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: usize, end: usize) -> EditSelection {
        EditSelection::new(start, end)
    }

    #[test]
    fn grow_then_shrink_restores_each_step() {
        let stream = TokenStream::new("(+ 1 (* 2 3))");
        let mut stack = ExpansionStack::new();
        let caret = EditSelection::caret(8);

        let first = stack.grow(&stream, caret);
        assert_eq!(first, Some(range(8, 9)));
        let second = stack.grow(&stream, range(8, 9));
        assert_eq!(second, Some(range(5, 12)));
        let third = stack.grow(&stream, range(5, 12));
        assert_eq!(third, Some(range(0, 13)));
        assert_eq!(stack.grow(&stream, range(0, 13)), None);

        assert_eq!(stack.shrink(range(0, 13)), Some(range(5, 12)));
        assert_eq!(stack.shrink(range(5, 12)), Some(range(8, 9)));
        assert_eq!(stack.shrink(range(8, 9)), Some(caret));
        assert_eq!(stack.shrink(caret), None);
    }

    #[test]
    fn shrink_ignores_foreign_selection() {
        let stream = TokenStream::new("(a b)");
        let mut stack = ExpansionStack::new();
        stack.grow(&stream, EditSelection::caret(1));
        assert_eq!(stack.shrink(range(3, 4)), None);
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn grow_from_foreign_selection_resets_history() {
        let stream = TokenStream::new("(a b) (c d)");
        let mut stack = ExpansionStack::new();
        stack.grow(&stream, EditSelection::caret(1));
        stack.grow(&stream, EditSelection::caret(7));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.top(), Some(range(7, 8)));
    }

    #[test]
    fn shrink_without_history_is_noop() {
        let mut stack = ExpansionStack::default();
        assert_eq!(stack.shrink(EditSelection::caret(0)), None);
        assert!(stack.is_empty());
    }

    #[test]
    fn reversed_selection_comes_back_reversed() {
        let stream = TokenStream::new("(a bc d)");
        let mut stack = ExpansionStack::new();
        let reversed = range(5, 3);
        assert_eq!(stack.grow(&stream, reversed), Some(range(0, 8)));
        assert_eq!(stack.shrink(range(0, 8)), Some(reversed));
    }

    #[test]
    fn flipped_grown_selection_is_foreign() {
        let stream = TokenStream::new("(a b)");
        let mut stack = ExpansionStack::new();
        stack.grow(&stream, EditSelection::caret(1));
        assert_eq!(stack.shrink(range(2, 1)), None);
    }
}
