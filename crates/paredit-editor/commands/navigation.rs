//! Motion commands: move, yank and cut
//!
//! Each motion runs from the caret (the selection's active end). Yank and
//! cut act on the text between the caret and the motion's target, or on the
//! target range itself for motions that select a form.

use super::CommandOutcome;
use crate::core::EditableDocument;
use paredit_core::edit::kill::cut_span;
use paredit_core::navigation::{motion_target, Motion, MotionTarget};
use paredit_core::{EditPlan, EditSelection, PareditMode, TextEdit, TokenStream};

/// What to do with a motion's range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NavigationAction {
    /// Move the caret or select the target
    Move,
    /// Copy the range to the clipboard
    Yank,
    /// Copy the range to the clipboard and delete it
    Cut,
}

/// Plan `motion` from the document's caret
pub fn plan_navigation(
    document: &EditableDocument,
    motion: Motion,
    action: NavigationAction,
    mode: PareditMode,
) -> CommandOutcome {
    let text = document.text();
    let stream = TokenStream::new(&text);
    let caret = document.selection().cursor.offset;
    let Some(target) = motion_target(&stream, caret, motion) else {
        return CommandOutcome::NotApplicable;
    };

    match action {
        NavigationAction::Move => {
            let selection = match target {
                MotionTarget::Point(offset) => EditSelection::caret(offset),
                MotionTarget::Range(range) => EditSelection::from_span(range),
            };
            CommandOutcome::Edits(EditPlan::select(selection))
        }
        NavigationAction::Yank => {
            let span = target.span_from(caret);
            match span.slice(&text) {
                Some(copied) if !span.is_empty() => CommandOutcome::Yank {
                    text: copied.to_string(),
                },
                _ => CommandOutcome::NotApplicable,
            }
        }
        NavigationAction::Cut => {
            let span = target.span_from(caret);
            if span.is_empty() {
                return CommandOutcome::NotApplicable;
            }
            let cut = match mode {
                PareditMode::Strict => cut_span(&text, span),
                PareditMode::Original => span.slice(&text).map(|removed| {
                    let plan = EditPlan::new(
                        vec![TextEdit::delete(span)],
                        EditSelection::caret(span.start),
                    );
                    (plan, removed.to_string())
                }),
            };
            cut.map_or(CommandOutcome::NotApplicable, |(plan, text)| {
                CommandOutcome::Cut { plan, text }
            })
        }
    }
}
