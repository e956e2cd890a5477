//! Waygate durable storage
//!
//! This crate defines the [`WarpStore`] port — the write-behind target of the
//! registry's durability decorator — and two adapters:
//!
//! - **SqliteWarpStore**: the production backend, a two-table SQLite schema
//!   behind an sqlx pool
//! - **MemoryWarpStore**: an in-memory backend for development and tests,
//!   which also records an operation journal so write ordering can be
//!   asserted
//!
//! Store methods are only ever invoked from the registry's single writer
//! worker (mutations) or from startup/reload code (`list_all`), never
//! concurrently with pending writes.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports
pub use error::{StorageError, StorageResult};
pub use memory::{JournalEntry, MemoryWarpStore};
pub use sqlite::{SqliteConfig, SqliteWarpStore};
pub use traits::WarpStore;
