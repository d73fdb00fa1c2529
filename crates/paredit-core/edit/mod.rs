//! Structural edit operations
//!
//! Every operation is a pure function from a buffer snapshot and a selection
//! to an [`EditOutcome`]: either a batch of non-overlapping [`TextEdit`]s plus
//! the selection to show afterwards, or [`EditOutcome::NotApplicable`] when
//! the structure the operation needs is absent. Operations never touch the
//! host; applying a plan is the caller's job (see [`apply_edits`]).
//!
//! Offsets in a plan's edits refer to the original buffer. The plan's
//! selection refers to the buffer after the edits are applied.
//!
//! # Example
//!
//! ```rust
//! use paredit_core::edit::{apply_edits, slurp, EditOutcome, EditSelection};
//!
//! let source = "(foo) bar";
//! let EditOutcome::Edits(plan) = slurp::forward_slurp(source, EditSelection::caret(5)) else {
//!     panic!("slurp should apply");
//! };
//! assert_eq!(apply_edits(source, &plan.edits)?, "(foo bar)");
//! assert_eq!(plan.selection, EditSelection::caret(4));
//! # Ok::<(), paredit_core::CoreError>(())
//! ```

pub mod delete;
pub mod kill;
pub mod slurp;
pub mod splice;
pub mod transpose;
pub mod wrap;

use core::fmt;
use core::str::FromStr;

use crate::cursor::{ListRange, TokenStream};
use crate::tokenizer::TokenType;
use crate::utils::{CoreError, Result, Span};

/// Replace `range` of the original buffer with `text`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextEdit {
    /// Range in the original buffer
    pub range: Span,
    /// Replacement text
    pub text: String,
}

impl TextEdit {
    /// Replace `range` with `text`
    #[must_use]
    pub fn replace(range: Span, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    /// Insert `text` at `offset`
    #[must_use]
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(Span::empty(offset), text)
    }

    /// Delete `range`
    #[must_use]
    pub fn delete(range: Span) -> Self {
        Self::replace(range, String::new())
    }

    /// Check whether the edit changes nothing
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.text.is_empty()
    }

    /// Minimal single edit turning `old` into `new`
    ///
    /// Trims the common prefix and suffix on character boundaries. Returns
    /// `None` when the texts are equal.
    #[must_use]
    pub fn diff(old: &str, new: &str) -> Option<Self> {
        if old == new {
            return None;
        }
        let prefix = old
            .char_indices()
            .zip(new.chars())
            .find(|((_, a), b)| a != b)
            .map_or_else(|| old.len().min(new.len()), |((index, _), _)| index);
        let prefix = floor_char_boundary(new, prefix.min(new.len()));

        let old_rest = &old[prefix..];
        let new_rest = &new[prefix..];
        let suffix = old_rest
            .chars()
            .rev()
            .zip(new_rest.chars().rev())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .sum::<usize>();

        Some(Self::replace(
            Span::new(prefix, old.len() - suffix),
            &new[prefix..new.len() - suffix],
        ))
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Selection as anchor and active end, a caret when both are equal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditSelection {
    /// Fixed end
    pub anchor: usize,
    /// Moving end, where the caret is drawn
    pub active: usize,
}

impl EditSelection {
    /// Create selection from anchor and active offsets
    #[must_use]
    pub const fn new(anchor: usize, active: usize) -> Self {
        Self { anchor, active }
    }

    /// Collapsed selection at `offset`
    #[must_use]
    pub const fn caret(offset: usize) -> Self {
        Self {
            anchor: offset,
            active: offset,
        }
    }

    /// Selection covering `span`, active at its end
    #[must_use]
    pub const fn from_span(span: Span) -> Self {
        Self {
            anchor: span.start,
            active: span.end,
        }
    }

    /// Check whether the selection is a caret
    #[must_use]
    pub const fn is_caret(&self) -> bool {
        self.anchor == self.active
    }

    /// Covered range, normalized
    #[must_use]
    pub const fn span(&self) -> Span {
        Span::new(self.anchor, self.active)
    }

    /// Map both ends through `edits` with the given bias
    #[must_use]
    pub fn map(&self, edits: &[TextEdit], bias: Bias) -> Self {
        Self {
            anchor: map_offset_biased(edits, self.anchor, bias),
            active: map_offset_biased(edits, self.active, bias),
        }
    }
}

impl fmt::Display for EditSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_caret() {
            write!(f, "|{}", self.active)
        } else {
            write!(f, "{}->{}", self.anchor, self.active)
        }
    }
}

/// Edits and the resulting selection of one operation
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditPlan {
    /// Non-overlapping edits against the original buffer
    pub edits: Vec<TextEdit>,
    /// Selection in the edited buffer
    pub selection: EditSelection,
}

impl EditPlan {
    /// Create a plan
    #[must_use]
    pub fn new(edits: Vec<TextEdit>, selection: EditSelection) -> Self {
        let edits = edits.into_iter().filter(|edit| !edit.is_noop()).collect();
        Self { edits, selection }
    }

    /// Plan that only moves the selection
    #[must_use]
    pub const fn select(selection: EditSelection) -> Self {
        Self {
            edits: Vec::new(),
            selection,
        }
    }

    /// Check whether the plan changes the buffer
    #[must_use]
    pub fn modifies_content(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Smallest range of the original buffer touched by the edits
    #[must_use]
    pub fn affected_range(&self) -> Option<Span> {
        self.edits
            .iter()
            .map(|edit| edit.range)
            .reduce(|a, b| a.union(b))
    }
}

/// Result of a structural operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// Edits to apply and the selection to show afterwards
    Edits(EditPlan),
    /// The required structure is absent; nothing changes
    NotApplicable,
}

impl EditOutcome {
    /// Check if the operation produced a plan
    #[must_use]
    pub const fn is_applicable(&self) -> bool {
        matches!(self, Self::Edits(_))
    }

    /// Borrow the plan, if any
    #[must_use]
    pub const fn plan(&self) -> Option<&EditPlan> {
        match self {
            Self::Edits(plan) => Some(plan),
            Self::NotApplicable => None,
        }
    }

    /// Take the plan, if any
    #[must_use]
    pub fn into_plan(self) -> Option<EditPlan> {
        match self {
            Self::Edits(plan) => Some(plan),
            Self::NotApplicable => None,
        }
    }
}

/// Deletion discipline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum PareditMode {
    /// Refuse deletions that would unbalance brackets
    #[default]
    Strict,
    /// Delete raw characters
    Original,
}

impl PareditMode {
    /// The other mode
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Strict => Self::Original,
            Self::Original => Self::Strict,
        }
    }

    /// Name used in configuration
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Original => "original",
        }
    }
}

impl fmt::Display for PareditMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PareditMode {
    type Err = String;

    /// Parse `strict` or `original`, ignoring case and surrounding whitespace
    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "original" => Ok(Self::Original),
            other => Err(format!("unknown paredit mode '{other}'")),
        }
    }
}

/// Which side an offset sticks to when text is inserted exactly at it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bias {
    /// Stay before inserted text
    Left,
    /// Move after inserted text
    Right,
}

/// Map an offset in the original buffer through `edits`, left-biased
#[must_use]
pub fn map_offset(edits: &[TextEdit], offset: usize) -> usize {
    map_offset_biased(edits, offset, Bias::Left)
}

/// Map an offset in the original buffer through `edits`
///
/// An offset inside a replaced range collapses to the start of the
/// replacement.
#[must_use]
pub fn map_offset_biased(edits: &[TextEdit], offset: usize, bias: Bias) -> usize {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| edit.range.start);

    let mut added = 0usize;
    let mut removed = 0usize;
    for edit in sorted {
        let Span { start, end } = edit.range;
        let before = end < offset
            || (end == offset && start < offset)
            || (bias == Bias::Right && start == offset && end == offset);
        if before {
            added += edit.text.len();
            removed += end - start;
        } else if start < offset && offset < end {
            return start + added - removed;
        }
    }
    offset + added - removed
}

/// Sort and validate `edits` against a buffer of `len` bytes
fn validated<'e>(source: &str, edits: &'e [TextEdit]) -> Result<Vec<&'e TextEdit>> {
    let mut sorted: Vec<&TextEdit> = edits.iter().collect();
    sorted.sort_by_key(|edit| (edit.range.start, edit.range.end));

    for edit in &sorted {
        let Span { start, end } = edit.range;
        if end > source.len() {
            return Err(CoreError::OutOfBounds {
                start,
                end,
                len: source.len(),
            });
        }
        for offset in [start, end] {
            if !source.is_char_boundary(offset) {
                return Err(CoreError::NotCharBoundary { offset });
            }
        }
    }
    for pair in sorted.windows(2) {
        let (first, second) = (pair[0].range, pair[1].range);
        if first.end > second.start {
            return Err(CoreError::OverlappingEdits {
                first_start: first.start,
                first_end: first.end,
                second_start: second.start,
                second_end: second.end,
            });
        }
    }
    Ok(sorted)
}

/// Check a batch of edits without applying it
///
/// # Errors
///
/// Returns an error if an edit is out of bounds, splits a character, or
/// overlaps another edit.
pub fn validate_edits(source: &str, edits: &[TextEdit]) -> Result<()> {
    validated(source, edits).map(|_| ())
}

/// Apply a batch of non-overlapping edits to `source`
///
/// # Errors
///
/// Returns an error if an edit is out of bounds, splits a character, or
/// overlaps another edit. `source` is never partially edited.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    let sorted = validated(source, edits)?;
    let delta: usize = sorted.iter().map(|edit| edit.text.len()).sum();
    let mut result = String::with_capacity(source.len() + delta);
    let mut last = 0;
    for edit in sorted {
        result.push_str(&source[last..edit.range.start]);
        result.push_str(&edit.text);
        last = edit.range.end;
    }
    result.push_str(&source[last..]);
    Ok(result)
}

/// Finish an operation: refuse plans that leave more unmatched brackets
///
/// On a balanced buffer this refuses anything that unbalances it. On an
/// unbalanced one, edits may repair or keep the damage but never add to it.
fn checked_plan(
    stream: &TokenStream<'_>,
    edits: Vec<TextEdit>,
    selection: EditSelection,
) -> EditOutcome {
    let plan = EditPlan::new(edits, selection);
    if !plan.modifies_content() {
        return EditOutcome::Edits(plan);
    }
    match apply_edits(stream.source(), &plan.edits) {
        Ok(result) => {
            if TokenStream::new(&result).unmatched_count() > stream.unmatched_count() {
                log::debug!("refusing plan that would unbalance the buffer");
                EditOutcome::NotApplicable
            } else {
                EditOutcome::Edits(plan)
            }
        }
        Err(err) => {
            log::debug!("discarding malformed plan: {err}");
            EditOutcome::NotApplicable
        }
    }
}

/// List whose brackets an operation at `caret` acts on
///
/// Inside a list, the innermost enclosing list. At top level, the list whose
/// closing bracket ends at the caret, or failing that the list whose opener
/// starts there.
fn target_list(stream: &TokenStream<'_>, caret: usize) -> Option<ListRange> {
    let cursor = stream.cursor_at(caret);
    if let Some(list) = cursor.enclosing_list() {
        return Some(list);
    }
    if cursor.is_interior() {
        return None;
    }
    if let Some(token) = cursor.prev_token().filter(|token| token.is_close()) {
        return stream.cursor_at(token.offset).enclosing_list();
    }
    let mut inside = cursor;
    let starts_list = cursor
        .token()
        .is_some_and(|token| matches!(token.token_type, TokenType::Open(_) | TokenType::ReaderMacro));
    if starts_list && inside.forward_down_sexp() {
        return inside
            .enclosing_list()
            .filter(|list| list.outer_start == caret);
    }
    None
}

/// Start of the whitespace run before `offset`, never landing after a line comment
fn whitespace_start_before(stream: &TokenStream<'_>, offset: usize) -> usize {
    let mut cursor = stream.cursor_at(offset);
    cursor.backward_whitespace(false);
    if cursor
        .prev_token()
        .is_some_and(|token| token.token_type == TokenType::LineComment)
    {
        offset
    } else {
        cursor.offset()
    }
}

/// End of the whitespace run after `offset`
fn whitespace_end_after(stream: &TokenStream<'_>, offset: usize) -> usize {
    let mut cursor = stream.cursor_at(offset);
    cursor.forward_whitespace(false);
    cursor.offset()
}
