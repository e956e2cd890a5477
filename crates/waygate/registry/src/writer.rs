//! Single-worker store write serializer
//!
//! Mutations leave the registry as [`StoreJob`]s on an unbounded channel
//! drained by exactly one worker task. The worker awaits each store call
//! before taking the next job, so writes reach the durable store strictly in
//! submission order — for the same warp and across warps — no matter how
//! quickly they were issued. A slow write delays everything behind it; that
//! is the contract, not a bug.
//!
//! Submission never blocks and never fails the caller. Store errors are
//! logged with the warp name and operation kind so the row can be reconciled
//! by hand; the worker keeps going.

use crate::error::ShutdownError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};
use waygate_storage::{StorageResult, WarpStore};
use waygate_types::{Invitation, Warp};

/// One queued durable-store write, carrying the post-mutation snapshot
#[derive(Debug, Clone)]
pub enum StoreJob {
    Add(Warp),
    Remove(Warp),
    UpdateCreator(Warp),
    UpdateLocation(Warp),
    UpdateKind(Warp),
    UpdateVisits(Warp),
    UpdateWelcomeMessage(Warp),
    AddInvitation { warp: Warp, invitation: Invitation },
    RemoveInvitation { warp: Warp, invitation: Invitation },
}

impl StoreJob {
    /// Operation kind, for logs.
    pub fn op(&self) -> &'static str {
        match self {
            StoreJob::Add(_) => "add",
            StoreJob::Remove(_) => "remove",
            StoreJob::UpdateCreator(_) => "update_creator",
            StoreJob::UpdateLocation(_) => "update_location",
            StoreJob::UpdateKind(_) => "update_kind",
            StoreJob::UpdateVisits(_) => "update_visits",
            StoreJob::UpdateWelcomeMessage(_) => "update_welcome_message",
            StoreJob::AddInvitation { .. } => "add_invitation",
            StoreJob::RemoveInvitation { .. } => "remove_invitation",
        }
    }

    /// Name of the warp this write concerns, for logs.
    pub fn warp_name(&self) -> &str {
        match self {
            StoreJob::Add(warp)
            | StoreJob::Remove(warp)
            | StoreJob::UpdateCreator(warp)
            | StoreJob::UpdateLocation(warp)
            | StoreJob::UpdateKind(warp)
            | StoreJob::UpdateVisits(warp)
            | StoreJob::UpdateWelcomeMessage(warp)
            | StoreJob::AddInvitation { warp, .. }
            | StoreJob::RemoveInvitation { warp, .. } => &warp.name,
        }
    }

    async fn apply(&self, store: &dyn WarpStore) -> StorageResult<()> {
        match self {
            StoreJob::Add(warp) => store.add_warp(warp).await,
            StoreJob::Remove(warp) => store.remove_warp(warp).await,
            StoreJob::UpdateCreator(warp) => store.update_creator(warp).await,
            StoreJob::UpdateLocation(warp) => store.update_location(warp).await,
            StoreJob::UpdateKind(warp) => store.update_kind(warp).await,
            StoreJob::UpdateVisits(warp) => store.update_visits(warp).await,
            StoreJob::UpdateWelcomeMessage(warp) => store.update_welcome_message(warp).await,
            StoreJob::AddInvitation { warp, invitation } => {
                store.add_invitation(warp, invitation).await
            }
            StoreJob::RemoveInvitation { warp, invitation } => {
                store.remove_invitation(warp, invitation).await
            }
        }
    }
}

/// Handle to the single writer worker
///
/// Owned by the durability decorator. Dropping the handle without calling
/// [`shutdown`](StoreWriter::shutdown) leaves queued writes to the runtime's
/// mercy; orderly teardown should always drain.
pub struct StoreWriter {
    tx: mpsc::UnboundedSender<StoreJob>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<()>,
}

impl StoreWriter {
    /// Spawn the worker task around a store handle.
    pub fn spawn(store: Arc<dyn WarpStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<StoreJob>();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker_pending = Arc::clone(&pending);

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                if let Err(e) = job.apply(store.as_ref()).await {
                    error!(
                        error = %e,
                        warp = %job.warp_name(),
                        op = job.op(),
                        "durable store write failed"
                    );
                }
                worker_pending.fetch_sub(1, Ordering::AcqRel);
            }
        });

        Self {
            tx,
            pending,
            worker,
        }
    }

    /// Enqueue a write. Returns immediately; never fails the caller.
    pub fn submit(&self, job: StoreJob) {
        self.pending.fetch_add(1, Ordering::AcqRel);
        if let Err(rejected) = self.tx.send(job) {
            self.pending.fetch_sub(1, Ordering::AcqRel);
            let job = rejected.0;
            warn!(
                warp = %job.warp_name(),
                op = job.op(),
                "store writer already shut down; write discarded"
            );
        }
    }

    /// Number of writes submitted but not yet applied.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Stop accepting writes and drain the queue, waiting at most `grace`.
    ///
    /// On timeout the worker is cancelled and the number of writes that never
    /// reached the store is reported. This is the only point where a
    /// submitted write may be dropped.
    pub async fn shutdown(self, grace: Duration) -> std::result::Result<(), ShutdownError> {
        let Self {
            tx,
            pending,
            mut worker,
        } = self;
        drop(tx);

        match tokio::time::timeout(grace, &mut worker).await {
            Ok(joined) => {
                if joined.is_err() {
                    error!("store writer worker panicked during drain");
                }
                Ok(())
            }
            Err(_) => {
                worker.abort();
                Err(ShutdownError::DrainTimeout {
                    dropped: pending.load(Ordering::Acquire),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use waygate_storage::MemoryWarpStore;
    use waygate_types::{PlayerId, Position, Rotation, WarpBuilder, WarpKind, WorldId};

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

    #[tokio::test]
    async fn drains_everything_within_grace() {
        let store = Arc::new(MemoryWarpStore::new());
        let writer = StoreWriter::spawn(store.clone());

        writer.submit(StoreJob::Add(warp("a")));
        writer.submit(StoreJob::Add(warp("b")));
        writer.submit(StoreJob::UpdateVisits(warp("a")));

        writer.shutdown(Duration::from_secs(5)).await.unwrap();

        let journal = store.journal();
        let ops: Vec<&str> = journal.iter().map(|e| e.op).collect();
        assert_eq!(ops, vec!["add", "add", "update_visits"]);
    }

    /// Store whose mutations never complete, to force a drain timeout.
    struct StalledStore;

    impl StalledStore {
        async fn stall(&self) -> StorageResult<()> {
            std::future::pending::<()>().await;
            Ok(())
        }
    }

    #[async_trait]
    impl WarpStore for StalledStore {
        async fn add_warp(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn remove_warp(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn update_creator(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn update_location(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn update_kind(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn update_visits(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn update_welcome_message(&self, _warp: &Warp) -> StorageResult<()> {
            self.stall().await
        }
        async fn add_invitation(
            &self,
            _warp: &Warp,
            _invitation: &Invitation,
        ) -> StorageResult<()> {
            self.stall().await
        }
        async fn remove_invitation(
            &self,
            _warp: &Warp,
            _invitation: &Invitation,
        ) -> StorageResult<()> {
            self.stall().await
        }
        async fn list_all(&self) -> StorageResult<Vec<Warp>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn drain_timeout_reports_dropped_writes() {
        let writer = StoreWriter::spawn(Arc::new(StalledStore));

        writer.submit(StoreJob::Add(warp("a")));
        writer.submit(StoreJob::Add(warp("b")));
        writer.submit(StoreJob::Add(warp("c")));

        let err = writer
            .shutdown(Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, ShutdownError::DrainTimeout { dropped: 3 }));
    }

    #[tokio::test]
    async fn failed_writes_do_not_stop_the_worker() {
        let store = Arc::new(MemoryWarpStore::new());
        let writer = StoreWriter::spawn(store.clone());

        // An update for a warp the store never saw fails inside the worker;
        // the next write still goes through.
        writer.submit(StoreJob::UpdateVisits(warp("ghost")));
        writer.submit(StoreJob::Add(warp("a")));

        writer.shutdown(Duration::from_secs(5)).await.unwrap();
        assert!(store.stored("a").is_some());
    }
}
