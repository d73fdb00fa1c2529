//! Core types for the paredit editor layer
//!
//! This module contains the fundamental building blocks:
//! - `EditableDocument`: the mirrored host buffer with selection and history
//! - Position, range and selection types
//! - Configuration and error types

pub mod config;
pub mod document;
pub mod errors;
pub mod position;

// Re-export commonly used types
pub use config::{PareditConfig, DEFAULT_LANGUAGES};
pub use document::EditableDocument;
pub use errors::{EditorError, Result};
pub use position::{LineColumn, Position, PositionBuilder, Range, Selection};
