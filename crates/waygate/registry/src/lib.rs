//! Waygate warp registry
//!
//! The registry is the authoritative, in-memory collection of warps, keyed
//! by name. Cross-cutting concerns are layered on as explicit wrappers
//! behind one shared trait:
//!
//! - **MemoryWarpRegistry**: the plain name-keyed map; no I/O, no locking
//! - **PersistentWarpRegistry**: applies each mutation in memory, then hands
//!   an equivalent write to the [`StoreWriter`]
//! - **EventfulWarpRegistry**: publishes one [`WarpEvent`] per mutation on a
//!   broadcast channel
//!
//! composed at construction time as
//! `EventfulWarpRegistry<PersistentWarpRegistry<MemoryWarpRegistry>>`
//! (see [`load_registry`]).
//!
//! ## Ownership and threading
//!
//! The registry is owned by one logical context; every mutator takes
//! `&mut self`, so exclusive access is enforced by the borrow checker rather
//! than by convention or locks. Reads never touch the durable store. The
//! only cross-thread piece is the [`StoreWriter`]'s worker task, which owns
//! the store handle and applies writes strictly in submission order.
//!
//! Durability is deliberately decoupled from the caller's success path: a
//! successful mutation is guaranteed against the in-memory registry
//! immediately, and against the durable store eventually. Store failures are
//! logged by the worker, never surfaced to the mutating caller.

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod error;
pub mod eventful;
pub mod memory;
pub mod persistent;
pub mod registry;
pub mod writer;

// Re-exports
pub use bootstrap::{load_registry, WarpStack};
pub use error::{RegistryError, Result, ShutdownError};
pub use eventful::EventfulWarpRegistry;
pub use memory::MemoryWarpRegistry;
pub use persistent::PersistentWarpRegistry;
pub use registry::WarpRegistry;
pub use writer::{StoreJob, StoreWriter};

pub use waygate_types::WarpEvent;
