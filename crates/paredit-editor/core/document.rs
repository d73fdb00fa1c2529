//! Mirrored document for structural commands
//!
//! Provides [`EditableDocument`], the engine's copy of a host buffer: its
//! text in a rope, the live selection and the grow/shrink history. Commands
//! plan against this mirror; the host owns the real buffer.

use super::errors::{EditorError, Result};
use super::position::{LineColumn, Position, PositionBuilder, Range, Selection};
use paredit_core::edit::{apply_edits, validate_edits};
use paredit_core::{EditPlan, ExpansionStack, TokenStream};

/// Engine-side copy of one host document
#[derive(Debug, Clone)]
pub struct EditableDocument {
    /// Rope holding the mirrored text
    text_rope: ropey::Rope,

    /// Host document identifier
    id: String,

    /// Host language identifier, e.g. `clojure`
    language_id: String,

    /// Live selection as last seen or set
    selection: Selection,

    /// Incremented on every content change
    version: u64,

    /// Selections visited by grow, for shrink
    expansion: ExpansionStack,
}

impl EditableDocument {
    /// Create a mirror with the caret at the start
    pub fn new(id: impl Into<String>, language_id: impl Into<String>, text: &str) -> Self {
        Self {
            text_rope: ropey::Rope::from_str(text),
            id: id.into(),
            language_id: language_id.into(),
            selection: Selection::default(),
            version: 0,
            expansion: ExpansionStack::new(),
        }
    }

    /// Get document identifier
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Get language identifier
    #[must_use]
    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    /// Change the language identifier
    pub fn set_language_id(&mut self, language_id: impl Into<String>) {
        self.language_id = language_id.into();
    }

    /// Get text content as string
    #[must_use]
    pub fn text(&self) -> String {
        self.text_rope.to_string()
    }

    /// Get direct access to the rope
    #[must_use]
    pub const fn rope(&self) -> &ropey::Rope {
        &self.text_rope
    }

    /// Get total length in bytes
    #[must_use]
    pub fn len_bytes(&self) -> usize {
        self.text_rope.len_bytes()
    }

    /// Get total number of lines
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.text_rope.len_lines()
    }

    /// Check if document is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len_bytes() == 0
    }

    /// Content version, bumped by every change
    #[must_use]
    pub const fn version(&self) -> u64 {
        self.version
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Grow/shrink history
    #[must_use]
    pub const fn expansion(&self) -> &ExpansionStack {
        &self.expansion
    }

    /// Forget the grow/shrink history
    pub fn clear_expansion(&mut self) {
        self.expansion.clear();
    }

    /// Whether the brackets of the mirrored text are balanced
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        paredit_core::is_balanced(&self.text())
    }

    /// Get text content for a range
    pub fn text_range(&self, range: Range) -> Result<String> {
        let start = range.start.offset;
        let end = range.end.offset;
        if end > self.len_bytes() {
            return Err(EditorError::InvalidRange {
                start,
                end,
                length: self.len_bytes(),
            });
        }
        let start_char = self.text_rope.try_byte_to_char(start).map_err(|_| {
            EditorError::PositionOutOfBounds {
                position: start,
                length: self.len_bytes(),
            }
        })?;
        let end_char = self.text_rope.try_byte_to_char(end).map_err(|_| {
            EditorError::PositionOutOfBounds {
                position: end,
                length: self.len_bytes(),
            }
        })?;
        Ok(self.text_rope.slice(start_char..end_char).to_string())
    }

    /// Convert byte position to line/column
    pub fn position_to_line_column(&self, pos: Position) -> Result<LineColumn> {
        LineColumn::from_offset(&self.text_rope, pos.offset)
    }

    /// Convert line/column to byte position
    pub fn line_column_to_position(&self, line_column: LineColumn) -> Result<Position> {
        PositionBuilder::new()
            .line(line_column.line)
            .column(line_column.column)
            .build(&self.text_rope)
    }

    /// Check that `selection` lies on character boundaries of `text`
    fn check_selection(text: &str, selection: Selection) -> Result<()> {
        for offset in [selection.anchor.offset, selection.cursor.offset] {
            if offset > text.len() {
                return Err(EditorError::PositionOutOfBounds {
                    position: offset,
                    length: text.len(),
                });
            }
            if !text.is_char_boundary(offset) {
                return Err(paredit_core::CoreError::NotCharBoundary { offset }.into());
            }
        }
        Ok(())
    }

    /// Store `selection`, dropping the history unless it is what grow or
    /// shrink just produced
    fn store_selection(&mut self, selection: Selection) {
        if self.expansion.top() != Some(selection.into()) {
            self.expansion.clear();
        }
        self.selection = selection;
    }

    /// Replace the selection
    ///
    /// # Errors
    ///
    /// Returns `Err` if either end is past the text or inside a character.
    pub fn set_selection(&mut self, selection: Selection) -> Result<()> {
        Self::check_selection(&self.text(), selection)?;
        self.store_selection(selection);
        Ok(())
    }

    /// Bring the mirror in line with the host's text and selection
    ///
    /// Returns whether the text differed.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the selection does not fit `text`; the mirror is left
    /// unchanged.
    pub fn sync_from_host(&mut self, text: &str, selection: Selection) -> Result<bool> {
        Self::check_selection(text, selection)?;
        let changed = self.text_rope != text;
        if changed {
            log::trace!(
                "resync of {} at version {}: {} -> {} bytes",
                self.id,
                self.version,
                self.len_bytes(),
                text.len()
            );
            self.text_rope = ropey::Rope::from_str(text);
            self.version += 1;
            self.expansion.clear();
        }
        self.store_selection(selection);
        Ok(changed)
    }

    /// Apply a plan atomically
    ///
    /// Either every edit lands and the plan's selection is stored, or the
    /// document is untouched.
    ///
    /// # Errors
    ///
    /// Returns `Err` on overlapping or out-of-range edits, or a selection
    /// that does not fit the edited text.
    pub fn apply(&mut self, plan: &EditPlan) -> Result<()> {
        let selection = Selection::from(plan.selection);
        if !plan.modifies_content() {
            return self.set_selection(selection);
        }

        let current = self.text();
        validate_edits(&current, &plan.edits)?;
        let updated = apply_edits(&current, &plan.edits)?;
        Self::check_selection(&updated, selection)?;

        let mut edits: Vec<_> = plan.edits.iter().collect();
        edits.sort_by_key(|edit| edit.range.start);
        for edit in edits.into_iter().rev() {
            let start = self.text_rope.byte_to_char(edit.range.start);
            let end = self.text_rope.byte_to_char(edit.range.end);
            self.text_rope.remove(start..end);
            self.text_rope.insert(start, &edit.text);
        }
        debug_assert_eq!(self.text_rope, updated.as_str());

        self.version += 1;
        self.expansion.clear();
        self.selection = selection;
        Ok(())
    }

    /// Grow the selection to the next enclosing form
    ///
    /// Returns the new selection, or `None` when nothing larger exists.
    pub fn grow_selection(&mut self) -> Option<Selection> {
        let text = self.text();
        let stream = TokenStream::new(&text);
        let next = self.expansion.grow(&stream, self.selection.into())?;
        self.selection = next.into();
        Some(self.selection)
    }

    /// Restore the selection before the last grow
    ///
    /// Returns `None` when the selection was changed some other way since.
    /// The selection the first grow started from comes back with its
    /// direction intact.
    pub fn shrink_selection(&mut self) -> Option<Selection> {
        let previous = self.expansion.shrink(self.selection.into())?;
        self.selection = previous.into();
        Some(self.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use paredit_core::{EditSelection, Span, TextEdit};
    use pretty_assertions::assert_eq;

    fn caret(offset: usize) -> Selection {
        Selection::empty(Position::new(offset))
    }

    #[test]
    fn new_document_starts_at_origin() {
        let doc = EditableDocument::new("a.clj", "clojure", "(a b)\n(c)");
        assert_eq!(doc.id(), "a.clj");
        assert_eq!(doc.language_id(), "clojure");
        assert_eq!(doc.len_bytes(), 9);
        assert_eq!(doc.len_lines(), 2);
        assert_eq!(doc.selection(), caret(0));
        assert_eq!(doc.version(), 0);
        assert!(doc.is_balanced());
    }

    #[test]
    fn text_range_and_line_columns() {
        let doc = EditableDocument::new("a", "clojure", "(a)\n(λ x)");
        let range = Range::new(Position::new(4), Position::new(8));
        assert_eq!(doc.text_range(range).unwrap(), "(λ ");
        let lc = doc.position_to_line_column(Position::new(7)).unwrap();
        assert_eq!((lc.line, lc.column), (2, 3));
        assert_eq!(
            doc.line_column_to_position(lc).unwrap(),
            Position::new(7)
        );
        assert!(doc
            .text_range(Range::new(Position::new(0), Position::new(40)))
            .is_err());
    }

    #[test]
    fn apply_is_atomic() {
        let mut doc = EditableDocument::new("a", "clojure", "(a b)");
        let overlapping = EditPlan::new(
            vec![
                TextEdit::delete(Span::new(1, 3)),
                TextEdit::delete(Span::new(2, 4)),
            ],
            EditSelection::caret(1),
        );
        assert!(doc.apply(&overlapping).is_err());
        assert_eq!(doc.text(), "(a b)");
        assert_eq!(doc.version(), 0);

        let plan = EditPlan::new(
            vec![
                TextEdit::insert(4, " c"),
                TextEdit::delete(Span::new(1, 3)),
            ],
            EditSelection::caret(1),
        );
        doc.apply(&plan).unwrap();
        assert_eq!(doc.text(), "(b c)");
        assert_eq!(doc.selection(), caret(1));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn apply_rejects_selection_outside_result() {
        let mut doc = EditableDocument::new("a", "clojure", "(a b)");
        let plan = EditPlan::new(
            vec![TextEdit::delete(Span::new(1, 4))],
            EditSelection::caret(5),
        );
        assert!(doc.apply(&plan).is_err());
        assert_eq!(doc.text(), "(a b)");
    }

    #[test]
    fn sync_from_host_detects_changes() {
        let mut doc = EditableDocument::new("a", "clojure", "(a)");
        assert!(!doc.sync_from_host("(a)", caret(1)).unwrap());
        assert_eq!(doc.version(), 0);
        assert!(doc.sync_from_host("(a b)", caret(4)).unwrap());
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.selection(), caret(4));
        assert!(doc.sync_from_host("(a)", caret(9)).is_err());
        assert_eq!(doc.text(), "(a b)");
    }

    #[test]
    fn grow_and_shrink_retrace() {
        let mut doc = EditableDocument::new("a", "clojure", "(a (bc d))");
        doc.set_selection(caret(5)).unwrap();
        let first = doc.grow_selection().unwrap();
        assert_eq!(first.range(), Range::new(Position::new(4), Position::new(6)));
        let second = doc.grow_selection().unwrap();
        assert_eq!(second.range(), Range::new(Position::new(3), Position::new(9)));

        assert_eq!(doc.shrink_selection(), Some(first));
        assert_eq!(doc.shrink_selection(), Some(caret(5)));
        assert_eq!(doc.shrink_selection(), None);
    }

    #[test]
    fn shrink_restores_reversed_selection() {
        let mut doc = EditableDocument::new("a", "clojure", "(a bc d)");
        let reversed = Selection::new(Position::new(5), Position::new(3));
        doc.set_selection(reversed).unwrap();
        let grown = doc.grow_selection().unwrap();
        assert_eq!(grown.range(), Range::new(Position::new(0), Position::new(8)));
        assert_eq!(doc.shrink_selection(), Some(reversed));
    }

    #[test]
    fn unrelated_selection_resets_history() {
        let mut doc = EditableDocument::new("a", "clojure", "(a (bc d))");
        doc.set_selection(caret(5)).unwrap();
        doc.grow_selection().unwrap();
        doc.set_selection(caret(1)).unwrap();
        assert!(doc.expansion().is_empty());
        assert_eq!(doc.shrink_selection(), None);
    }

    #[test]
    fn grown_selection_survives_its_own_plan() {
        let mut doc = EditableDocument::new("a", "clojure", "(a b)");
        doc.set_selection(caret(1)).unwrap();
        let grown = doc.grow_selection().unwrap();
        doc.apply(&EditPlan::select(grown.into())).unwrap();
        assert_eq!(doc.expansion().len(), 2);
    }
}
