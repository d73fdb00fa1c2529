//! # Paredit Core
//!
//! Structural editing engine for Lisp-family source text (Clojure, Common
//! Lisp, Scheme). Everything here is a pure function of a buffer snapshot:
//! the engine never owns a document and never talks to an editor.
//!
//! ## Layers
//!
//! - [`tokenizer`]: lossless lexer. Token texts concatenate back to the input,
//!   and lexing never fails on malformed text.
//! - [`cursor`]: [`TokenStream`] and the `Copy` [`TokenCursor`] with sexp,
//!   list and up/down motions.
//! - [`navigation`]: range queries (current sexp, enclosing form, defun) and
//!   the grow/shrink [`ExpansionStack`].
//! - [`edit`]: slurp, barf, splice, raise, convolute, split, wrap, kill,
//!   transpose and balanced deletion, each returning an [`EditOutcome`].
//!
//! ## Quick Start
//!
//! ```rust
//! use paredit_core::edit::{apply_edits, splice, EditOutcome, EditSelection};
//!
//! let source = "(a (b c) d)";
//! if let EditOutcome::Edits(plan) = splice::splice(source, EditSelection::caret(5)) {
//!     assert_eq!(apply_edits(source, &plan.edits)?, "(a b c d)");
//! }
//! # Ok::<(), paredit_core::CoreError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]

pub mod cursor;
pub mod edit;
pub mod navigation;
pub mod tokenizer;
pub mod utils;

pub use cursor::{is_balanced, ListRange, TokenCursor, TokenStream};
pub use edit::{
    apply_edits, EditOutcome, EditPlan, EditSelection, PareditMode, TextEdit,
};
pub use navigation::ExpansionStack;
pub use tokenizer::{DelimiterType, SexpTokenizer, Token, TokenType};
pub use utils::{CoreError, Result, Span};

/// Crate version for runtime compatibility checks
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
