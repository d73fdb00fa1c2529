//! Error types for the paredit-editor crate
//!
//! `EditorError` wraps `CoreError` from paredit-core and adds the failures of
//! the host boundary: bad positions, rejected edit batches, stale mirrors,
//! unknown commands and invalid configuration. Structural no-ops are never
//! errors; they surface as `CommandOutcome::NotApplicable`.

use core::fmt;
use paredit_core::utils::errors::CoreError;
use thiserror::Error;

/// Main error type for paredit-editor operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    /// Errors from paredit-core
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Document not open in the session
    #[error("Document not found: {id}")]
    DocumentNotFound { id: String },

    /// Invalid line/column position
    #[error("Invalid position: line {line}, column {column}")]
    InvalidPosition { line: usize, column: usize },

    /// Position out of bounds
    #[error("Position out of bounds: {position} (document length: {length})")]
    PositionOutOfBounds { position: usize, length: usize },

    /// Invalid text range
    #[error("Invalid range: start {start}, end {end} (document length: {length})")]
    InvalidRange {
        start: usize,
        end: usize,
        length: usize,
    },

    /// The host refused to apply an edit batch
    #[error("Host rejected edits: {message}")]
    HostRejected { message: String },

    /// Mirror could not be brought back in step with the host
    #[error("Stale document {id} at mirror version {version}")]
    StaleDocument { id: String, version: u64 },

    /// Command name not recognized
    #[error("Unknown command: {name}")]
    UnknownCommand { name: String },

    /// Configuration value could not be parsed
    #[error("Invalid configuration value for {key}: {value}")]
    InvalidConfig { key: String, value: String },

    /// Too many event handlers registered
    #[error("Event handler limit exceeded: {current}/{limit}")]
    HandlerLimitExceeded { current: usize, limit: usize },

    /// Event channel error
    #[error("Event channel error: {message}")]
    EventChannelError { message: String },
}

impl EditorError {
    /// Create a host rejection error
    pub fn host_rejected<T: fmt::Display>(message: T) -> Self {
        Self::HostRejected {
            message: message.to_string(),
        }
    }

    /// Create an unknown command error
    pub fn unknown_command<T: fmt::Display>(name: T) -> Self {
        Self::UnknownCommand {
            name: name.to_string(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config<K: fmt::Display, V: fmt::Display>(key: K, value: V) -> Self {
        Self::InvalidConfig {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an event channel error
    pub fn event_channel<T: fmt::Display>(message: T) -> Self {
        Self::EventChannelError {
            message: message.to_string(),
        }
    }

    /// Check if error is recoverable
    ///
    /// A rejected or stale edit is recoverable: the next command resyncs from
    /// the host and plans again.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(_)
            | Self::DocumentNotFound { .. }
            | Self::InvalidPosition { .. }
            | Self::PositionOutOfBounds { .. }
            | Self::InvalidRange { .. }
            | Self::HostRejected { .. }
            | Self::StaleDocument { .. }
            | Self::UnknownCommand { .. }
            | Self::InvalidConfig { .. }
            | Self::EventChannelError { .. } => true,
            Self::HandlerLimitExceeded { .. } => false,
        }
    }

    /// Check if this is a position-related error
    #[must_use]
    pub const fn is_position_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidPosition { .. }
                | Self::PositionOutOfBounds { .. }
                | Self::InvalidRange { .. }
        )
    }

    /// Get the underlying core error if this wraps one
    #[must_use]
    pub const fn as_core_error(&self) -> Option<&CoreError> {
        match self {
            Self::Core(core_err) => Some(core_err),
            _ => None,
        }
    }
}

/// Result type alias for editor operations
pub type Result<T> = core::result::Result<T, EditorError>;
