//! Error types for the audio stego store.

use thiserror::Error;

/// Result type alias for store and bot operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while storing, embedding or serving containers.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No container has been uploaded for this identity.
    #[error("No uploaded audio for user: {0}")]
    NotFound(String),

    /// Message does not fit into the payload.
    #[error("Message too long to hide: need {needed} payload bytes, have {available}")]
    CapacityExceeded { needed: usize, available: usize },

    /// Input is shorter than the fixed container header.
    #[error("Malformed container: expected at least {expected} bytes, got {actual}")]
    MalformedContainer { expected: usize, actual: usize },

    /// Identity cannot be used as a storage directory name.
    #[error("Invalid user identity: {0:?}")]
    InvalidIdentity(String),

    /// Payload ran out before a terminator byte was found.
    #[error("No terminator found in payload")]
    NoTerminator,

    /// Event kind the processor does not handle.
    #[error("Unknown event type: {0}")]
    UnknownEventType(String),

    /// Event arrived without the sender metadata it needs.
    #[error("Unknown meta type: {0}")]
    UnknownMetaType(String),

    /// Fetching the uploaded audio failed.
    #[error("Download failed: {0}")]
    Download(String),

    /// Sending a reply failed.
    #[error("Delivery failed: {0}")]
    Delivery(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Errors that are answered with a reply instead of failing the event.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_) | Error::CapacityExceeded { .. } | Error::InvalidIdentity(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Download(e.to_string())
    }
}
