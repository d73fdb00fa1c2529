//! Buffer-rewriting commands
//!
//! Thin dispatch from [`EditOperation`] to the pure operations of
//! `paredit_core::edit`, fed from the mirrored document.

use super::CommandOutcome;
use crate::core::EditableDocument;
use paredit_core::edit::{delete, kill, slurp, splice, transpose, wrap};
use paredit_core::{EditOutcome, EditSelection, PareditMode};

/// A structural rewrite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperation {
    /// Pull the next sibling into the list
    SlurpForward,
    /// Pull the previous sibling into the list
    SlurpBackward,
    /// Push the last child out
    BarfForward,
    /// Push the first child out
    BarfBackward,
    /// Remove the enclosing brackets
    Splice,
    /// Split the enclosing list or string
    Split,
    /// Splice, deleting after the caret
    SpliceKillForward,
    /// Splice, deleting before the caret
    SpliceKillBackward,
    /// Replace the enclosing list with the current sexp
    Raise,
    /// Swap the nesting of the two innermost lists
    Convolute,
    /// Delete to the end of the list
    KillListForward,
    /// Delete to the start of the list
    KillListBackward,
    /// Delete the next sexp
    KillSexpForward,
    /// Delete the previous sexp
    KillSexpBackward,
    /// Delete the character or selection after the caret
    DeleteForward,
    /// Delete the character or selection before the caret
    DeleteBackward,
    /// Wrap in a bracket pair
    Wrap {
        /// Opening text
        open: &'static str,
        /// Closing text
        close: &'static str,
    },
    /// Swap the sexps around the caret
    Transpose,
}

impl EditOperation {
    /// Run the operation on `source`
    pub fn run(self, source: &str, selection: EditSelection, mode: PareditMode) -> EditOutcome {
        match self {
            Self::SlurpForward => slurp::forward_slurp(source, selection),
            Self::SlurpBackward => slurp::backward_slurp(source, selection),
            Self::BarfForward => slurp::forward_barf(source, selection),
            Self::BarfBackward => slurp::backward_barf(source, selection),
            Self::Splice => splice::splice(source, selection),
            Self::Split => splice::split(source, selection),
            Self::SpliceKillForward => splice::splice_killing_forward(source, selection),
            Self::SpliceKillBackward => splice::splice_killing_backward(source, selection),
            Self::Raise => splice::raise(source, selection),
            Self::Convolute => splice::convolute(source, selection),
            Self::KillListForward => kill::kill_forward_list(source, selection),
            Self::KillListBackward => kill::kill_backward_list(source, selection),
            Self::KillSexpForward => kill::kill_sexp_forward(source, selection),
            Self::KillSexpBackward => kill::kill_sexp_backward(source, selection),
            Self::DeleteForward => delete::delete_forward(source, selection, mode),
            Self::DeleteBackward => delete::delete_backward(source, selection, mode),
            Self::Wrap { open, close } => wrap::wrap_around(source, selection, open, close),
            Self::Transpose => transpose::transpose(source, selection),
        }
    }
}

/// Plan `operation` against the document's text and selection
pub fn plan_edit(
    operation: EditOperation,
    document: &EditableDocument,
    mode: PareditMode,
) -> CommandOutcome {
    let text = document.text();
    let selection: EditSelection = document.selection().into();
    let outcome = operation.run(&text, selection, mode);
    if !outcome.is_applicable() {
        log::debug!("{operation:?} not applicable at {selection}");
    }
    outcome.into()
}
