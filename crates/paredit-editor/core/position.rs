//! Position and range types for document editing
//!
//! Positions are byte offsets into the mirrored text, matching the offsets
//! paredit-core computes. [`LineColumn`] is the host-facing form; conversion
//! goes through the rope.

use crate::core::errors::{EditorError, Result};
use core::fmt;
use paredit_core::{EditSelection, Span};

/// A position in a document represented as byte offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Byte offset from the beginning of the document
    pub offset: usize,
}

impl Position {
    /// Create a new position from byte offset
    #[must_use]
    pub const fn new(offset: usize) -> Self {
        Self { offset }
    }

    /// Create a position at the start of the document
    #[must_use]
    pub const fn start() -> Self {
        Self { offset: 0 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.offset)
    }
}

/// A line/column position in a document
///
/// Lines and columns are 1-indexed; columns count Unicode scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineColumn {
    /// 1-indexed line number
    pub line: usize,
    /// 1-indexed column number
    pub column: usize,
}

impl LineColumn {
    /// Create a new line/column position
    ///
    /// # Errors
    /// Returns error if line or column is 0
    pub const fn new(line: usize, column: usize) -> Result<Self> {
        if line == 0 || column == 0 {
            return Err(EditorError::InvalidPosition { line, column });
        }
        Ok(Self { line, column })
    }

    /// Create at start of document (1, 1)
    #[must_use]
    pub const fn start() -> Self {
        Self { line: 1, column: 1 }
    }

    /// Line/column of a byte offset in `rope`
    ///
    /// # Errors
    /// Returns error if the offset is past the end or inside a character
    pub fn from_offset(rope: &ropey::Rope, offset: usize) -> Result<Self> {
        let length = rope.len_bytes();
        if offset > length {
            return Err(EditorError::PositionOutOfBounds {
                position: offset,
                length,
            });
        }
        let char_idx = rope.byte_to_char(offset);
        if rope.char_to_byte(char_idx) != offset {
            return Err(EditorError::PositionOutOfBounds {
                position: offset,
                length,
            });
        }
        let line_idx = rope.char_to_line(char_idx);
        let column = char_idx - rope.line_to_char(line_idx);
        Ok(Self {
            line: line_idx + 1,
            column: column + 1,
        })
    }
}

impl fmt::Display for LineColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A range in a document represented by start and end positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    /// Start position (inclusive)
    pub start: Position,
    /// End position (exclusive)
    pub end: Position,
}

impl Range {
    /// Create a new range
    ///
    /// Automatically normalizes so start <= end
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        if start.offset <= end.offset {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Create an empty range at position
    #[must_use]
    pub const fn empty(pos: Position) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Check if range is empty (start == end)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.offset == self.end.offset
    }

    /// Get the length of the range in bytes
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.offset.saturating_sub(self.start.offset)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl From<Span> for Range {
    fn from(span: Span) -> Self {
        Self::new(Position::new(span.start), Position::new(span.end))
    }
}

impl From<Range> for Span {
    fn from(range: Range) -> Self {
        Self::new(range.start.offset, range.end.offset)
    }
}

/// Builder for document positions from line/column or offset
///
/// ```
/// use paredit_editor::PositionBuilder;
///
/// let rope = ropey::Rope::from_str("(ns demo)\n(defn f [])");
/// let pos = PositionBuilder::new().line(2).column(2).build(&rope)?;
/// assert_eq!(pos.offset, 11);
/// # Ok::<(), paredit_editor::EditorError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct PositionBuilder {
    line: Option<usize>,
    column: Option<usize>,
    offset: Option<usize>,
}

impl PositionBuilder {
    /// Create a new position builder
    #[must_use]
    pub const fn new() -> Self {
        Self {
            line: None,
            column: None,
            offset: None,
        }
    }

    /// Set line number (1-indexed)
    #[must_use]
    pub const fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Set column number (1-indexed)
    #[must_use]
    pub const fn column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Set byte offset directly
    #[must_use]
    pub const fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Build position using rope for line/column conversion
    ///
    /// If offset is provided, uses that directly. Otherwise converts from
    /// line/column; with neither, the start of the document.
    ///
    /// # Errors
    /// Returns error if the offset is past the end, or the line or column
    /// does not exist
    pub fn build(self, rope: &ropey::Rope) -> Result<Position> {
        if let Some(offset) = self.offset {
            if offset > rope.len_bytes() {
                return Err(EditorError::PositionOutOfBounds {
                    position: offset,
                    length: rope.len_bytes(),
                });
            }
            return Ok(Position::new(offset));
        }
        let (Some(line), Some(column)) = (self.line, self.column) else {
            return Ok(Position::start());
        };
        LineColumn::new(line, column)?;

        let line_idx = line - 1;
        let col_idx = column - 1;
        if line_idx >= rope.len_lines() {
            return Err(EditorError::InvalidPosition { line, column });
        }

        let line_start = rope.line_to_char(line_idx);
        let line_len = rope.line(line_idx).len_chars();
        if col_idx > line_len {
            return Err(EditorError::InvalidPosition { line, column });
        }
        Ok(Position::new(rope.char_to_byte(line_start + col_idx)))
    }
}

/// Selection with a direction
///
/// The anchor is where the selection started, and the cursor is where it
/// currently ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    /// Where the selection started
    pub anchor: Position,
    /// Where the selection cursor is
    pub cursor: Position,
}

impl Selection {
    /// Create a new selection
    #[must_use]
    pub const fn new(anchor: Position, cursor: Position) -> Self {
        Self { anchor, cursor }
    }

    /// Create an empty selection at position
    #[must_use]
    pub const fn empty(pos: Position) -> Self {
        Self {
            anchor: pos,
            cursor: pos,
        }
    }

    /// Check if selection is empty (no selected text)
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.anchor.offset == self.cursor.offset
    }

    /// Get the range covered by this selection (normalized)
    #[must_use]
    pub const fn range(&self) -> Range {
        Range::new(self.anchor, self.cursor)
    }
}

impl From<EditSelection> for Selection {
    fn from(selection: EditSelection) -> Self {
        Self::new(
            Position::new(selection.anchor),
            Position::new(selection.active),
        )
    }
}

impl From<Selection> for EditSelection {
    fn from(selection: Selection) -> Self {
        Self::new(selection.anchor.offset, selection.cursor.offset)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "|{}", self.cursor)
        } else {
            write!(f, "{}->{}", self.anchor, self.cursor)
        }
    }
}
