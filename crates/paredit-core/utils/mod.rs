//! Utility types shared across the tokenizer, cursor and edit modules
//!
//! Contains the half-open [`Span`] used for every byte range in the crate
//! and the crate-wide [`CoreError`].
//!
//! # Example
//!
//! ```rust
//! use paredit_core::utils::Span;
//!
//! let source = "(foo bar)";
//! let span = Span::new(1, 4);
//! assert_eq!(span.slice(source), Some("foo"));
//! assert!(Span::new(0, 9).strictly_encloses(span));
//! ```

use core::fmt;

pub mod errors;

pub use errors::{CoreError, Result};

/// Half-open byte range `[start, end)` into a source buffer
///
/// Constructed spans are always normalized so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
}

impl Span {
    /// Create a span, swapping the bounds if they are reversed
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Empty span at `offset`
    #[must_use]
    pub const fn empty(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Length in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check whether the span covers no bytes
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Check whether `other` lies entirely within this span
    #[must_use]
    pub const fn encloses(&self, other: Self) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check whether this span encloses `other` and is strictly larger
    #[must_use]
    pub const fn strictly_encloses(&self, other: Self) -> bool {
        self.encloses(other) && self.len() > other.len()
    }

    /// Smallest span covering both
    #[must_use]
    pub fn union(&self, other: Self) -> Self {
        Self::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Borrow the covered text, if the span is valid for `source`
    #[must_use]
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

impl From<core::ops::Range<usize>> for Span {
    fn from(range: core::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_normalizes_reversed_bounds() {
        let span = Span::new(7, 3);
        assert_eq!(span.start, 3);
        assert_eq!(span.end, 7);
        assert_eq!(span.len(), 4);
    }

    #[test]
    fn span_containment() {
        let outer = Span::new(0, 10);
        let inner = Span::new(2, 5);
        assert!(outer.encloses(inner));
        assert!(outer.strictly_encloses(inner));
        assert!(outer.encloses(outer));
        assert!(!outer.strictly_encloses(outer));
        assert!(!inner.encloses(outer));
    }

    #[test]
    fn span_union() {
        assert_eq!(Span::new(0, 4).union(Span::new(6, 8)), Span::new(0, 8));
    }

    #[test]
    fn span_slice_respects_bounds() {
        let source = "(a b)";
        assert_eq!(Span::new(1, 2).slice(source), Some("a"));
        assert_eq!(Span::new(3, 9).slice(source), None);
        assert_eq!(Span::empty(2).to_string(), "2..2");
    }
}
