//! Registry error types

use thiserror::Error;
use waygate_storage::StorageError;

/// Errors surfaced synchronously by registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// `add` or `populate` hit a name that is already taken. The registry is
    /// left untouched by the rejected operation.
    #[error("a warp named `{0}` already exists")]
    DuplicateName(String),

    /// A field-group mutation targeted a name that is not registered.
    #[error("no warp named `{0}`")]
    UnknownName(String),

    /// Bulk loading from the durable store failed. Only the bootstrap path
    /// produces this; live mutations never do.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Error from draining the store writer at shutdown
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// The bounded drain elapsed before the queue emptied. The remaining
    /// jobs were cancelled; `dropped` is how many writes never reached the
    /// durable store.
    #[error("store writer drain timed out; {dropped} queued write(s) dropped")]
    DrainTimeout { dropped: usize },
}
