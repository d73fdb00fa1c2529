//! Closing bracket guard for typed characters
//!
//! In strict mode a host reports each typed `)`, `]` or `}` after inserting
//! it. A bracket that closes nothing is taken back out, and if the same kind
//! of bracket follows, the caret steps over it instead. Everything else,
//! including brackets typed inside strings and comments, is left to the host.

use crate::core::{EditableDocument, PareditConfig};
use paredit_core::edit::delete::backspace_then_close;
use paredit_core::{EditPlan, EditSelection, PareditMode, TokenStream};

/// Characters the guard reacts to
pub const TRIGGER_CHARACTERS: [char; 3] = [')', ']', '}'];

/// What the host should do after a typed character
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnTypeDecision {
    /// Keep the typed character as is
    Defer,
    /// Replace the result of typing with this plan
    Edits(EditPlan),
}

/// Decide what to do about `ch`, typed just before the document's caret
///
/// `document` must already contain the typed character.
pub fn on_type(
    document: &EditableDocument,
    ch: char,
    mode: PareditMode,
    config: &PareditConfig,
) -> OnTypeDecision {
    if !TRIGGER_CHARACTERS.contains(&ch)
        || mode != PareditMode::Strict
        || !config.strict_prevent_unmatched_closing_bracket
    {
        return OnTypeDecision::Defer;
    }
    let selection = document.selection();
    if !selection.is_empty() {
        return OnTypeDecision::Defer;
    }

    let text = document.text();
    let caret = selection.cursor.offset;
    let stream = TokenStream::new(&text);
    let cursor = stream.cursor_at(caret);
    if cursor.within_comment() || cursor.within_string() {
        return OnTypeDecision::Defer;
    }

    match backspace_then_close(&text, caret, ch).into_plan() {
        Some(plan) if plan.modifies_content() || plan.selection != EditSelection::caret(caret) => {
            log::debug!("typed {ch:?} at {caret} rewritten");
            OnTypeDecision::Edits(plan)
        }
        _ => OnTypeDecision::Defer,
    }
}
