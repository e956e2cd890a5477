//! Durability decorator
//!
//! Wraps any registry and mirrors every mutation into the durable store
//! through the [`StoreWriter`]. The in-memory change always lands first, so
//! read-your-writes holds against the registry the moment a mutation
//! returns; the store catches up asynchronously. Callers are never told
//! about store failures — those surface in the writer's logs only.

use crate::error::Result;
use crate::registry::WarpRegistry;
use crate::writer::{StoreJob, StoreWriter};
use crate::ShutdownError;
use std::time::Duration;
use waygate_types::{Invitation, PlayerId, Position, Rotation, Warp, WarpKind, WorldId};

/// Registry wrapper that writes behind to a durable store
pub struct PersistentWarpRegistry<R> {
    inner: R,
    writer: StoreWriter,
}

impl<R: WarpRegistry> PersistentWarpRegistry<R> {
    pub fn new(inner: R, writer: StoreWriter) -> Self {
        Self { inner, writer }
    }

    /// Writes submitted but not yet applied to the store.
    pub fn pending_writes(&self) -> usize {
        self.writer.pending()
    }

    /// Drain queued writes and stop the worker; see [`StoreWriter::shutdown`].
    pub async fn shutdown(self, grace: Duration) -> std::result::Result<(), ShutdownError> {
        self.writer.shutdown(grace).await
    }

    /// Snapshot of the warp as it looks after a mutation, for the store job.
    fn snapshot(&self, name: &str) -> Option<Warp> {
        self.inner.get(name).cloned()
    }

    fn submit_update(&self, name: &str, job: impl FnOnce(Warp) -> StoreJob) {
        if let Some(warp) = self.snapshot(name) {
            self.writer.submit(job(warp));
        }
    }
}

impl<R: WarpRegistry> WarpRegistry for PersistentWarpRegistry<R> {
    fn add(&mut self, warp: Warp) -> Result<()> {
        let snapshot = warp.clone();
        self.inner.add(warp)?;
        self.writer.submit(StoreJob::Add(snapshot));
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Option<Warp> {
        let removed = self.inner.remove(name);
        if let Some(warp) = &removed {
            self.writer.submit(StoreJob::Remove(warp.clone()));
        }
        removed
    }

    fn get(&self, name: &str) -> Option<&Warp> {
        self.inner.get(name)
    }

    fn query(&self, predicate: &dyn Fn(&Warp) -> bool) -> Vec<&Warp> {
        self.inner.query(predicate)
    }

    fn count(&self, predicate: &dyn Fn(&Warp) -> bool) -> usize {
        self.inner.count(predicate)
    }

    fn populate(&mut self, batch: Vec<Warp>) -> Result<()> {
        // Cache population from the store itself; nothing to write back.
        self.inner.populate(batch)
    }

    fn depopulate(&mut self) {
        self.inner.depopulate();
    }

    fn update_location(
        &mut self,
        name: &str,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> Result<()> {
        self.inner.update_location(name, world, position, rotation)?;
        self.submit_update(name, StoreJob::UpdateLocation);
        Ok(())
    }

    fn update_kind(&mut self, name: &str, kind: WarpKind) -> Result<()> {
        self.inner.update_kind(name, kind)?;
        self.submit_update(name, StoreJob::UpdateKind);
        Ok(())
    }

    fn update_creator(&mut self, name: &str, creator: PlayerId) -> Result<()> {
        self.inner.update_creator(name, creator)?;
        self.submit_update(name, StoreJob::UpdateCreator);
        Ok(())
    }

    fn update_welcome_message(&mut self, name: &str, message: String) -> Result<()> {
        self.inner.update_welcome_message(name, message)?;
        self.submit_update(name, StoreJob::UpdateWelcomeMessage);
        Ok(())
    }

    fn record_visit(&mut self, name: &str) -> Result<()> {
        self.inner.record_visit(name)?;
        self.submit_update(name, StoreJob::UpdateVisits);
        Ok(())
    }

    fn invite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.inner.invite(name, invitation.clone())?;
        if let Some(warp) = self.snapshot(name) {
            self.writer
                .submit(StoreJob::AddInvitation { warp, invitation });
        }
        Ok(())
    }

    fn uninvite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.inner.uninvite(name, invitation.clone())?;
        if let Some(warp) = self.snapshot(name) {
            self.writer
                .submit(StoreJob::RemoveInvitation { warp, invitation });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWarpRegistry;
    use std::sync::Arc;
    use waygate_storage::MemoryWarpStore;
    use waygate_types::WarpBuilder;

    fn warp(name: &str) -> Warp {
        WarpBuilder::new(
            name,
            PlayerId::generate(),
            WarpKind::Public,
            WorldId::generate(),
            Position::new(0.0, 64.0, 0.0),
            Rotation::new(0.0, 0.0),
        )
        .build()
    }

    fn stack(store: Arc<MemoryWarpStore>) -> PersistentWarpRegistry<MemoryWarpRegistry> {
        PersistentWarpRegistry::new(MemoryWarpRegistry::new(), StoreWriter::spawn(store))
    }

    #[tokio::test]
    async fn add_is_readable_before_the_store_catches_up() {
        let store = Arc::new(MemoryWarpStore::new());
        let mut registry = stack(store);

        let spawn = warp("spawn");
        registry.add(spawn.clone()).unwrap();

        // No await between add and get: the in-memory copy is already there.
        assert_eq!(registry.get("spawn"), Some(&spawn));
    }

    #[tokio::test]
    async fn rejected_add_submits_nothing() {
        let store = Arc::new(MemoryWarpStore::new());
        let mut registry = stack(store.clone());

        registry.add(warp("spawn")).unwrap();
        registry.add(warp("spawn")).unwrap_err();

        registry.shutdown(Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.journal().len(), 1);
    }

    #[tokio::test]
    async fn update_jobs_carry_the_post_mutation_snapshot() {
        let store = Arc::new(MemoryWarpStore::new());
        let mut registry = stack(store.clone());

        registry.add(warp("spawn")).unwrap();
        registry
            .update_welcome_message("spawn", "hello".to_string())
            .unwrap();

        registry.shutdown(Duration::from_secs(5)).await.unwrap();
        assert_eq!(store.stored("spawn").unwrap().welcome_message, "hello");
    }

    #[tokio::test]
    async fn unknown_name_update_submits_nothing() {
        let store = Arc::new(MemoryWarpStore::new());
        let mut registry = stack(store.clone());

        registry.record_visit("ghost").unwrap_err();

        registry.shutdown(Duration::from_secs(5)).await.unwrap();
        assert!(store.journal().is_empty());
    }

    #[tokio::test]
    async fn populate_and_depopulate_write_nothing_back() {
        let store = Arc::new(MemoryWarpStore::new());
        let mut registry = stack(store.clone());

        registry.populate(vec![warp("a"), warp("b")]).unwrap();
        registry.depopulate();

        registry.shutdown(Duration::from_secs(5)).await.unwrap();
        assert!(store.journal().is_empty());
    }
}
