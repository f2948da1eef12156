//! Store-specific error handling.

use notepal_core::Error;

/// Whether a failed call was reading or writing.
///
/// Reads surface as [`Error::Fetch`], writes as [`Error::Write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    /// Wrap a message in the error variant for this access kind.
    pub fn error(self, message: impl Into<String>) -> Error {
        match self {
            Access::Read => Error::Fetch(message.into()),
            Access::Write => Error::Write(message.into()),
        }
    }
}

/// Store error classes derived from HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Missing or rejected API key (401/403).
    Unauthorized,
    /// Table or route does not exist (404).
    NotFound,
    /// Constraint violation (409).
    Conflict,
    /// Malformed filter or body (400).
    BadRequest,
    /// Rate limit exceeded (429).
    RateLimited,
    /// Server error (5xx).
    ServerError,
    /// Anything else.
    Unknown,
}

impl StoreErrorCode {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            409 => Self::Conflict,
            400 => Self::BadRequest,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a failed store response into a NotePal error.
pub fn to_notepal_error(code: StoreErrorCode, access: Access, message: &str) -> Error {
    match code {
        StoreErrorCode::Unauthorized => Error::Config(format!("Authentication failed: {}", message)),
        StoreErrorCode::NotFound => access.error(format!("Table not found: {}", message)),
        StoreErrorCode::Conflict => access.error(format!("Conflict: {}", message)),
        StoreErrorCode::BadRequest => access.error(format!("Bad request: {}", message)),
        StoreErrorCode::RateLimited => access.error(format!("Rate limit exceeded: {}", message)),
        StoreErrorCode::ServerError => access.error(format!("Server error: {}", message)),
        StoreErrorCode::Unknown => access.error(message.to_string()),
    }
}
