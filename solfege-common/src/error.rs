//! Common error types for the ear trainer
//!
//! Errors travel inside actions and application state, so the type is `Clone`.
//! I/O errors are kept behind an `Arc` for that reason.

use std::sync::Arc;
use thiserror::Error;

/// Common result type for trainer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error kinds shared by the practice manager, storage, playback and the app loop
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A precondition was violated (missing level/question, owning context gone)
    #[error("Unexpected state: {0}")]
    Unexpected(String),

    /// Scoring or stopping attempted without an active session
    #[error("No practice session in progress")]
    NoSessionInProgress,

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(Arc<std::io::Error>),

    /// Session storage could not complete an operation
    #[error("Storage error: {0}")]
    Storage(String),

    /// Note playback device failure
    #[error("Playback error: {0}")]
    Playback(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed caller input (note names, octaves)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Shorthand for [`Error::Unexpected`]
    pub fn unexpected(reason: impl Into<String>) -> Self {
        Error::Unexpected(reason.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(Arc::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts_and_clones() {
        let error: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        let cloned = error.clone();

        assert!(matches!(cloned, Error::Io(_)));
        assert_eq!(error.to_string(), "IO error: gone");
    }

    #[test]
    fn test_unexpected_message() {
        let error = Error::unexpected("no level selected");
        assert_eq!(error.to_string(), "Unexpected state: no level selected");
    }
}
