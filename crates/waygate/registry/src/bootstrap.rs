//! Assembling the registry stack
//!
//! Startup and reload both build a fresh stack: read everything from the
//! durable store while no writes are pending, populate a new in-memory
//! registry, then wrap it with durability and notification layers. The old
//! stack (if any) must have been shut down first — `list_all` is only safe
//! at quiescent points.

use crate::error::Result;
use crate::eventful::EventfulWarpRegistry;
use crate::memory::MemoryWarpRegistry;
use crate::persistent::PersistentWarpRegistry;
use crate::registry::WarpRegistry;
use crate::writer::StoreWriter;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;
use waygate_storage::WarpStore;
use waygate_types::WarpEvent;

/// The fully composed registry used by the host server
pub type WarpStack = EventfulWarpRegistry<PersistentWarpRegistry<MemoryWarpRegistry>>;

/// Load all stored warps and build the composed registry around them.
///
/// The store handle is shared with the writer worker; `events` is the bus
/// mutations will be announced on. Fails if the bulk read fails or the
/// stored data contains duplicate names.
pub async fn load_registry(
    store: Arc<dyn WarpStore>,
    events: broadcast::Sender<WarpEvent>,
) -> Result<WarpStack> {
    let batch = store.list_all().await?;
    let loaded = batch.len();

    let mut memory = MemoryWarpRegistry::new();
    memory.populate(batch)?;
    info!(warps = loaded, "warp registry populated from durable store");

    let writer = StoreWriter::spawn(store);
    Ok(EventfulWarpRegistry::new(
        PersistentWarpRegistry::new(memory, writer),
        events,
    ))
}
