//! Errors produced along the storage service chain.

use thiserror::Error;

/// Failure of a storage service call.
///
/// Values pass through decorators untouched, so the variant and message a
/// caller sees are the ones the innermost service produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    #[error("system type {0} is not supported")]
    Unsupported(String),

    #[error("{0}")]
    Validation(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Internal(e.to_string())
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, StorageError>;
