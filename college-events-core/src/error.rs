//! Error types for event store operations.

use std::path::PathBuf;

use thiserror::Error;

use crate::event::EventId;

/// Errors that can occur in event store operations.
#[derive(Error, Debug)]
pub enum EventsError {
    /// Caller-supplied data failed a field constraint. The store is untouched.
    #[error("Invalid event: {0}")]
    Validation(String),

    #[error("Event not found: {0}")]
    NotFound(EventId),

    /// The store file exists but is not a JSON array of events.
    /// Needs manual repair; nothing is rewritten.
    #[error("Event store {} is corrupt: {reason}", path.display())]
    CorruptStore { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for event store operations.
pub type EventsResult<T> = Result<T, EventsError>;
