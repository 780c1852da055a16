//! Error types for pagemerge.

use std::io;
use thiserror::Error;

use crate::source::SourceKind;

/// Result type alias for pagemerge operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reconciling documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading sources or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A text source could not deliver a page (or its page count).
    #[error("{kind} source unavailable for page {page}: {reason}")]
    SourceUnavailable {
        kind: SourceKind,
        /// 1-indexed page number, 0 when the page count itself failed
        page: u32,
        reason: String,
    },

    /// A pipeline option is out of range. Fatal to a run.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A whole document could not be processed.
    #[error("Document {id} failed: {reason}")]
    Document { id: String, reason: String },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a `SourceUnavailable` error.
    pub fn source_unavailable(kind: SourceKind, page: u32, reason: impl Into<String>) -> Self {
        Error::SourceUnavailable {
            kind,
            page,
            reason: reason.into(),
        }
    }

    /// Whether this error invalidates a whole run rather than one document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::InvalidConfig(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidConfig("chunk_target_words must be positive".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: chunk_target_words must be positive"
        );

        let err = Error::source_unavailable(SourceKind::Ocr, 4, "timeout");
        assert_eq!(err.to_string(), "ocr source unavailable for page 4: timeout");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_config_error_is_fatal() {
        assert!(Error::InvalidConfig("x".into()).is_fatal());
        assert!(!Error::Other("x".into()).is_fatal());
    }
}
