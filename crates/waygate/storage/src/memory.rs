//! In-memory store adapter
//!
//! Suitable for development and tests. Every mutation is also appended to a
//! journal, so tests can assert the exact order in which the writer worker
//! applied them.

use crate::error::{StorageError, StorageResult};
use crate::traits::WarpStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use waygate_types::{Invitation, Warp};

/// One applied store operation, in application order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournalEntry {
    pub op: &'static str,
    pub warp: String,
}

/// In-memory warp store with an operation journal
#[derive(Default)]
pub struct MemoryWarpStore {
    warps: RwLock<HashMap<String, Warp>>,
    journal: RwLock<Vec<JournalEntry>>,
}

impl MemoryWarpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed stored warps, bypassing the journal. Test/bootstrap helper.
    pub fn seeded(warps: impl IntoIterator<Item = Warp>) -> Self {
        let warps: HashMap<String, Warp> = warps
            .into_iter()
            .map(|warp| (warp.name.clone(), warp))
            .collect();
        Self {
            warps: RwLock::new(warps),
            journal: RwLock::new(Vec::new()),
        }
    }

    /// The operations applied so far, in order.
    pub fn journal(&self) -> Vec<JournalEntry> {
        self.journal.read().map(|j| j.clone()).unwrap_or_default()
    }

    /// Current stored snapshot of one warp.
    pub fn stored(&self, name: &str) -> Option<Warp> {
        self.warps.read().ok()?.get(name).cloned()
    }

    fn record(&self, op: &'static str, warp: &Warp) -> StorageResult<()> {
        self.journal
            .write()
            .map_err(|_| StorageError::Backend("journal lock poisoned".to_string()))?
            .push(JournalEntry {
                op,
                warp: warp.name.clone(),
            });
        Ok(())
    }

    fn upsert(&self, op: &'static str, warp: &Warp) -> StorageResult<()> {
        self.warps
            .write()
            .map_err(|_| StorageError::Backend("store lock poisoned".to_string()))?
            .insert(warp.name.clone(), warp.clone());
        self.record(op, warp)
    }

    /// Replace an existing row; mirrors the SQL adapter's `NotFound` when the
    /// warp was never added.
    fn update(&self, op: &'static str, warp: &Warp) -> StorageResult<()> {
        let mut map = self
            .warps
            .write()
            .map_err(|_| StorageError::Backend("store lock poisoned".to_string()))?;
        if !map.contains_key(&warp.name) {
            return Err(StorageError::NotFound(warp.name.clone()));
        }
        map.insert(warp.name.clone(), warp.clone());
        drop(map);
        self.record(op, warp)
    }
}

#[async_trait]
impl WarpStore for MemoryWarpStore {
    async fn add_warp(&self, warp: &Warp) -> StorageResult<()> {
        self.upsert("add", warp)
    }

    async fn remove_warp(&self, warp: &Warp) -> StorageResult<()> {
        self.warps
            .write()
            .map_err(|_| StorageError::Backend("store lock poisoned".to_string()))?
            .remove(&warp.name);
        self.record("remove", warp)
    }

    async fn update_creator(&self, warp: &Warp) -> StorageResult<()> {
        self.update("update_creator", warp)
    }

    async fn update_location(&self, warp: &Warp) -> StorageResult<()> {
        self.update("update_location", warp)
    }

    async fn update_kind(&self, warp: &Warp) -> StorageResult<()> {
        self.update("update_kind", warp)
    }

    async fn update_visits(&self, warp: &Warp) -> StorageResult<()> {
        self.update("update_visits", warp)
    }

    async fn update_welcome_message(&self, warp: &Warp) -> StorageResult<()> {
        self.update("update_welcome_message", warp)
    }

    async fn add_invitation(&self, warp: &Warp, _invitation: &Invitation) -> StorageResult<()> {
        self.update("add_invitation", warp)
    }

    async fn remove_invitation(&self, warp: &Warp, _invitation: &Invitation) -> StorageResult<()> {
        self.update("remove_invitation", warp)
    }

    async fn list_all(&self) -> StorageResult<Vec<Warp>> {
        Ok(self
            .warps
            .read()
            .map_err(|_| StorageError::Backend("store lock poisoned".to_string()))?
            .values()
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waygate_types::{PlayerId, Position, Rotation, WarpKind, WorldId};

    fn warp(name: &str) -> Warp {
        Warp::builder(
            name,
            PlayerId::generate(),
            WarpKind::Public,
            WorldId::generate(),
            Position::new(0.0, 64.0, 0.0),
            Rotation::new(0.0, 0.0),
        )
        .build()
    }

    #[tokio::test]
    async fn journal_preserves_application_order() {
        let store = MemoryWarpStore::new();
        let a = warp("a");
        let b = warp("b");

        store.add_warp(&a).await.unwrap();
        store.add_warp(&b).await.unwrap();
        store.update_visits(&a).await.unwrap();
        store.remove_warp(&b).await.unwrap();

        let journal = store.journal();
        let ops: Vec<(&str, &str)> = journal.iter().map(|e| (e.op, e.warp.as_str())).collect();
        assert_eq!(
            ops,
            vec![
                ("add", "a"),
                ("add", "b"),
                ("update_visits", "a"),
                ("remove", "b"),
            ]
        );
    }

    #[tokio::test]
    async fn list_all_reflects_mutations() {
        let store = MemoryWarpStore::new();
        let a = warp("a");
        store.add_warp(&a).await.unwrap();
        store.remove_warp(&a).await.unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
    }
}
