//! Storage error types

use thiserror::Error;

/// Errors raised by durable store adapters
///
/// These never reach the caller of a registry mutation; the writer worker
/// logs them with the warp name and operation kind.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("stored row could not be decoded: {0}")]
    Corrupt(String),

    #[error("no stored warp named `{0}`")]
    NotFound(String),
}

/// Result type for store operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}
