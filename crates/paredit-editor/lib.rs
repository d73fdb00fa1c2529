//! Editor integration layer for paredit-style structural editing
//!
//! `paredit-editor` connects the pure operations of `paredit-core` to a host
//! editor: it mirrors host documents, names every command the way hosts bind
//! them, keeps the strict/original mode, and hands edit plans back to the
//! host as one atomic batch.
//!
//! # Features
//!
//! - **Command table**: every command with its host name and REPL console name
//! - **Document mirrors**: rope-backed copies with selection and grow/shrink history
//! - **Strict mode**: deletions and typed closers that keep brackets balanced
//! - **Events**: filtered, prioritized notifications of applied and rejected edits
//!
//! # Example
//!
//! ```
//! use paredit_editor::{CommandId, HostEditor, PareditSession, Result, Selection};
//! use paredit_editor::core::Position;
//! use paredit_core::TextEdit;
//!
//! struct Buffer {
//!     text: String,
//!     selection: Selection,
//! }
//!
//! impl HostEditor for Buffer {
//!     fn document_id(&self) -> &str { "scratch.clj" }
//!     fn language_id(&self) -> &str { "clojure" }
//!     fn text(&self) -> String { self.text.clone() }
//!     fn selection(&self) -> Selection { self.selection }
//!     fn apply(&mut self, edits: &[TextEdit], selection: Selection) -> Result<()> {
//!         self.text = paredit_core::apply_edits(&self.text, edits)?;
//!         self.selection = selection;
//!         Ok(())
//!     }
//! }
//!
//! let mut buffer = Buffer {
//!     text: "(foo) bar".to_string(),
//!     selection: Selection::empty(Position::new(4)),
//! };
//! let mut session = PareditSession::default();
//! session.run_command(&mut buffer, &CommandId::SlurpSexpForward)?;
//! assert_eq!(buffer.text, "(foo bar)");
//! # Ok::<(), paredit_editor::EditorError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod commands;
pub mod core;
pub mod events;
pub mod ontype;
pub mod sessions;

// Re-export paredit-core types used across the public API
pub use paredit_core::{EditPlan, EditSelection, PareditMode, TextEdit};

// Public API exports
pub use commands::{
    CommandContext, CommandId, CommandKind, CommandOutcome, EditOperation, NavigationAction,
    StructuralCommand,
};
pub use core::{
    EditableDocument, EditorError, LineColumn, PareditConfig, Position, PositionBuilder, Range,
    Result, Selection,
};
pub use events::{
    EventChannel, EventChannelConfig, EventFilter, EventHandler, EventStats, ModeListener,
    ModeState, PareditEvent,
};
pub use ontype::{OnTypeDecision, TRIGGER_CHARACTERS};
pub use sessions::{HostEditor, PareditSession, SessionStats};
