//! Command system for structural editing
//!
//! Every host-visible command is a [`CommandId`]. Running one against an
//! [`EditableDocument`] produces a [`CommandOutcome`]: a plan for the host to
//! apply, clipboard text, a mode toggle, or nothing. Commands never touch the
//! host themselves; [`PareditSession`](crate::sessions::PareditSession) does.
//!
//! Hosts can add their own commands by implementing [`StructuralCommand`].

#[macro_use]
mod macros;
pub mod navigation;
pub mod structural;

use crate::core::{EditableDocument, EditorError, PareditConfig};
use core::fmt;
use core::str::FromStr;
use paredit_core::navigation::Motion;
use paredit_core::{EditPlan, PareditMode};

pub use navigation::{plan_navigation, NavigationAction};
pub use structural::{plan_edit, EditOperation};

/// What a command does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Move, copy or cut along a motion
    Navigate(Motion, NavigationAction),
    /// Grow the selection to the enclosing form
    GrowSelection,
    /// Undo the last grow
    ShrinkSelection,
    /// Rewrite the buffer
    Edit(EditOperation),
    /// Flip strict/original mode
    ToggleMode,
}

use CommandKind::{Edit, Navigate};
use EditOperation as Op;
use NavigationAction::{Cut, Move, Yank};

paredit_commands! {
    /// Select the enclosing top-level form
    RangeForDefun("paredit.rangeForDefun", -) => Navigate(Motion::RangeForDefun, Move);
    /// Move past the next sexp
    ForwardSexp("paredit.forwardSexp", "forward-sexp") => Navigate(Motion::ForwardSexp, Move);
    /// Move before the previous sexp
    BackwardSexp("paredit.backwardSexp", "backward-sexp") => Navigate(Motion::BackwardSexp, Move);
    /// Move into the next list
    ForwardDownSexp("paredit.forwardDownSexp", "down-list") => Navigate(Motion::ForwardDownSexp, Move);
    /// Move into the previous list, at its end
    BackwardDownSexp("paredit.backwardDownSexp", -) => Navigate(Motion::BackwardDownSexp, Move);
    /// Move before the enclosing open bracket
    BackwardUpSexp("paredit.backwardUpSexp", "backward-up-list") => Navigate(Motion::BackwardUpSexp, Move);
    /// Move past the enclosing close bracket
    ForwardUpSexp("paredit.forwardUpSexp", "forward-up-list") => Navigate(Motion::ForwardUpSexp, Move);
    /// Move just before the enclosing close bracket
    CloseList("paredit.closeList", -) => Navigate(Motion::CloseList, Move);

    /// Copy the enclosing top-level form
    YankRangeForDefun("paredit.yankRangeForDefun", -) => Navigate(Motion::RangeForDefun, Yank);
    /// Copy through the next sexp
    YankForwardSexp("paredit.yankForwardSexp", -) => Navigate(Motion::ForwardSexp, Yank);
    /// Copy back through the previous sexp
    YankBackwardSexp("paredit.yankBackwardSexp", -) => Navigate(Motion::BackwardSexp, Yank);
    /// Copy up to the inside of the next list
    YankForwardDownSexp("paredit.yankForwardDownSexp", -) => Navigate(Motion::ForwardDownSexp, Yank);
    /// Copy back to the inside end of the previous list
    YankBackwardDownSexp("paredit.yankBackwardDownSexp", -) => Navigate(Motion::BackwardDownSexp, Yank);
    /// Copy back to before the enclosing open bracket
    YankBackwardUpSexp("paredit.yankBackwardUpSexp", -) => Navigate(Motion::BackwardUpSexp, Yank);
    /// Copy through the enclosing close bracket
    YankForwardUpSexp("paredit.yankForwardUpSexp", -) => Navigate(Motion::ForwardUpSexp, Yank);
    /// Copy to the enclosing close bracket
    YankCloseList("paredit.yankCloseList", -) => Navigate(Motion::CloseList, Yank);

    /// Cut the enclosing top-level form
    CutRangeForDefun("paredit.cutRangeForDefun", -) => Navigate(Motion::RangeForDefun, Cut);
    /// Cut through the next sexp
    CutForwardSexp("paredit.cutForwardSexp", -) => Navigate(Motion::ForwardSexp, Cut);
    /// Cut back through the previous sexp
    CutBackwardSexp("paredit.cutBackwardSexp", -) => Navigate(Motion::BackwardSexp, Cut);
    /// Cut up to the inside of the next list
    CutForwardDownSexp("paredit.cutForwardDownSexp", -) => Navigate(Motion::ForwardDownSexp, Cut);
    /// Cut back to the inside end of the previous list
    CutBackwardDownSexp("paredit.cutBackwardDownSexp", -) => Navigate(Motion::BackwardDownSexp, Cut);
    /// Cut back to before the enclosing open bracket
    CutBackwardUpSexp("paredit.cutBackwardUpSexp", -) => Navigate(Motion::BackwardUpSexp, Cut);
    /// Cut through the enclosing close bracket
    CutForwardUpSexp("paredit.cutForwardUpSexp", -) => Navigate(Motion::ForwardUpSexp, Cut);
    /// Cut to the enclosing close bracket
    CutCloseList("paredit.cutCloseList", -) => Navigate(Motion::CloseList, Cut);

    /// Grow the selection to the enclosing form
    SexpRangeExpansion("paredit.sexpRangeExpansion", "grow-selection") => CommandKind::GrowSelection;
    /// Shrink the selection back
    SexpRangeContraction("paredit.sexpRangeContraction", "shrink-selection") => CommandKind::ShrinkSelection;

    /// Pull the next sibling into the list
    SlurpSexpForward("paredit.slurpSexpForward", "forward-slurp-sexp") => Edit(Op::SlurpForward);
    /// Push the last child out of the list
    BarfSexpForward("paredit.barfSexpForward", "forward-barf-sexp") => Edit(Op::BarfForward);
    /// Pull the previous sibling into the list
    SlurpSexpBackward("paredit.slurpSexpBackward", "backward-slurp-sexp") => Edit(Op::SlurpBackward);
    /// Push the first child out of the list
    BarfSexpBackward("paredit.barfSexpBackward", "backward-barf-sexp") => Edit(Op::BarfBackward);
    /// Split the enclosing list or string at the caret
    SplitSexp("paredit.splitSexp", "split-sexp") => Edit(Op::Split);
    /// Remove the enclosing brackets
    SpliceSexp("paredit.spliceSexp", "splice-sexp") => Edit(Op::Splice);
    /// Replace the enclosing list with the current sexp
    RaiseSexp("paredit.raiseSexp", -) => Edit(Op::Raise);
    /// Swap the nesting of the two innermost lists
    Convolute("paredit.convolute", -) => Edit(Op::Convolute);
    /// Delete to the end of the enclosing list
    KillListForward("paredit.killListForward", -) => Edit(Op::KillListForward);
    /// Delete to the start of the enclosing list
    KillListBackward("paredit.killListBackward", -) => Edit(Op::KillListBackward);
    /// Delete the next sexp
    KillSexpForward("paredit.killSexpForward", -) => Edit(Op::KillSexpForward);
    /// Delete the previous sexp
    KillSexpBackward("paredit.killSexpBackward", -) => Edit(Op::KillSexpBackward);
    /// Splice, deleting everything after the caret
    SpliceSexpKillForward("paredit.spliceSexpKillForward", "splice-sexp-killing-forward") => Edit(Op::SpliceKillForward);
    /// Splice, deleting everything before the caret
    SpliceSexpKillBackward("paredit.spliceSexpKillBackward", "splice-sexp-killing-backward") => Edit(Op::SpliceKillBackward);
    /// Delete forward, keeping brackets balanced in strict mode
    DeleteForward("paredit.deleteForward", "delete") => Edit(Op::DeleteForward);
    /// Delete backward, keeping brackets balanced in strict mode
    DeleteBackward("paredit.deleteBackward", "backspace") => Edit(Op::DeleteBackward);
    /// Wrap the current sexp or selection in `( )`
    WrapAroundParens("paredit.wrapAroundParens", "wrap-round") => Edit(Op::Wrap { open: "(", close: ")" });
    /// Wrap the current sexp or selection in `[ ]`
    WrapAroundSquare("paredit.wrapAroundSquare", "wrap-square") => Edit(Op::Wrap { open: "[", close: "]" });
    /// Wrap the current sexp or selection in `{ }`
    WrapAroundCurly("paredit.wrapAroundCurly", "wrap-curly") => Edit(Op::Wrap { open: "{", close: "}" });
    /// Swap the sexps around the caret
    Transpose("paredit.transpose", -) => Edit(Op::Transpose);
    /// Flip strict/original mode
    ToggleMode("paredit.togglemode", -) => CommandKind::ToggleMode;
}

impl CommandId {
    /// Look a command up by host name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|id| id.name() == name)
    }

    /// Look a command up by console name
    #[must_use]
    pub fn from_console_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.console_name() == Some(name))
    }

    /// Check if the command may change the buffer
    #[must_use]
    pub const fn modifies_content(self) -> bool {
        match self.kind() {
            CommandKind::Navigate(_, action) => matches!(action, NavigationAction::Cut),
            CommandKind::Edit(_) => true,
            CommandKind::GrowSelection | CommandKind::ShrinkSelection | CommandKind::ToggleMode => {
                false
            }
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandId {
    type Err = EditorError;

    /// Parse a host name or a console name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
            .or_else(|| Self::from_console_name(s))
            .ok_or_else(|| EditorError::unknown_command(s))
    }
}

/// What a command needs to know about the session it runs in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    /// Host language of the document
    pub language_id: String,
    /// Whether commands run for this document
    pub enabled: bool,
    /// Current deletion discipline
    pub mode: PareditMode,
}

impl CommandContext {
    /// Context for a document in `language_id` under `config`
    pub fn new(config: &PareditConfig, language_id: &str, mode: PareditMode) -> Self {
        Self {
            language_id: language_id.to_string(),
            enabled: config.enabled && config.supports_language(language_id),
            mode,
        }
    }
}

/// Result of planning a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Edits and selection for the host to apply
    Edits(EditPlan),
    /// Text for the clipboard, buffer unchanged
    Yank {
        /// Copied text
        text: String,
    },
    /// Edits that remove `text`, which goes to the clipboard once applied
    Cut {
        /// Deletion plan
        plan: EditPlan,
        /// Removed text
        text: String,
    },
    /// Request to flip the session's mode
    ToggleMode,
    /// The session's mode after a toggle
    ModeChanged(PareditMode),
    /// The host's REPL console ran this console command instead
    Forwarded(String),
    /// Nothing to do here
    NotApplicable,
}

impl CommandOutcome {
    /// The plan to hand to the host, if any
    #[must_use]
    pub const fn plan(&self) -> Option<&EditPlan> {
        match self {
            Self::Edits(plan) | Self::Cut { plan, .. } => Some(plan),
            _ => None,
        }
    }

    /// Check if nothing happened
    #[must_use]
    pub const fn is_not_applicable(&self) -> bool {
        matches!(self, Self::NotApplicable)
    }
}

impl From<paredit_core::EditOutcome> for CommandOutcome {
    fn from(outcome: paredit_core::EditOutcome) -> Self {
        outcome.into_plan().map_or(Self::NotApplicable, Self::Edits)
    }
}

/// A command a session can run
///
/// # Examples
///
/// ```
/// use paredit_editor::{
///     CommandContext, CommandOutcome, EditableDocument, StructuralCommand,
/// };
///
/// /// Select the whole buffer
/// #[derive(Debug)]
/// struct SelectAll;
///
/// impl StructuralCommand for SelectAll {
///     fn name(&self) -> &str {
///         "myhost.selectAll"
///     }
///
///     fn plan(&self, document: &mut EditableDocument, _: &CommandContext) -> CommandOutcome {
///         let end = document.len_bytes();
///         CommandOutcome::Edits(paredit_core::EditPlan::select(
///             paredit_core::EditSelection::new(0, end),
///         ))
///     }
/// }
/// ```
pub trait StructuralCommand: fmt::Debug {
    /// Host command name
    fn name(&self) -> &str;

    /// REPL console command to forward to, if any
    fn console_name(&self) -> Option<&str> {
        None
    }

    /// Plan the command against the mirrored document
    ///
    /// May move the document's selection, as grow and shrink do; text
    /// changes are only returned as plans.
    fn plan(&self, document: &mut EditableDocument, context: &CommandContext) -> CommandOutcome;
}

impl StructuralCommand for CommandId {
    fn name(&self) -> &str {
        CommandId::name(*self)
    }

    fn console_name(&self) -> Option<&str> {
        CommandId::console_name(*self)
    }

    fn plan(&self, document: &mut EditableDocument, context: &CommandContext) -> CommandOutcome {
        match self.kind() {
            CommandKind::Navigate(motion, action) => {
                plan_navigation(document, motion, action, context.mode)
            }
            CommandKind::GrowSelection => document
                .grow_selection()
                .map_or(CommandOutcome::NotApplicable, |selection| {
                    CommandOutcome::Edits(EditPlan::select(selection.into()))
                }),
            CommandKind::ShrinkSelection => document
                .shrink_selection()
                .map_or(CommandOutcome::NotApplicable, |selection| {
                    CommandOutcome::Edits(EditPlan::select(selection.into()))
                }),
            CommandKind::Edit(operation) => plan_edit(operation, document, context.mode),
            CommandKind::ToggleMode => CommandOutcome::ToggleMode,
        }
    }
}
