//! Error types for NotePal.

use thiserror::Error;

use crate::models::NoteId;

/// Result type alias using NotePal's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for NotePal operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Loading notes from the remote store returned no usable data
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A create/update/delete/bulk write returned no row
    #[error("Write error: {0}")]
    Write(String),

    /// Note not found in the remote store
    #[error("Note not found: {0}")]
    NoteNotFound(NoteId),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation aborted through its cancellation token
    #[error("Cancelled: {0}")]
    Cancelled(&'static str),
}

impl Error {
    /// True when the operation was aborted rather than failed.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled(_))
    }
}
