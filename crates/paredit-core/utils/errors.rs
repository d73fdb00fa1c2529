//! Core error type for paredit-core operations
//!
//! Structural operations never fail: a form that cannot be slurped is a
//! [`crate::edit::EditOutcome::NotApplicable`], not an error. `CoreError` is
//! reserved for malformed edit batches handed to [`crate::edit::apply_edits`].

use thiserror::Error;

/// Main error type for paredit-core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Two edits in one batch touch the same bytes
    #[error("Overlapping edits at {first_start}..{first_end} and {second_start}..{second_end}")]
    OverlappingEdits {
        first_start: usize,
        first_end: usize,
        second_start: usize,
        second_end: usize,
    },

    /// An edit range extends past the end of the buffer
    #[error("Edit range {start}..{end} out of bounds (buffer length {len})")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// An edit range splits a UTF-8 code point
    #[error("Offset {offset} is not on a character boundary")]
    NotCharBoundary { offset: usize },
}

/// Result type alias for convenience
pub type Result<T> = core::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_offsets() {
        let err = CoreError::OutOfBounds {
            start: 3,
            end: 9,
            len: 5,
        };
        assert_eq!(
            err.to_string(),
            "Edit range 3..9 out of bounds (buffer length 5)"
        );
        assert_eq!(
            CoreError::NotCharBoundary { offset: 2 }.to_string(),
            "Offset 2 is not on a character boundary"
        );
    }
}
