//! The durable store port

use crate::StorageResult;
use async_trait::async_trait;
use waygate_types::{Invitation, Warp};

/// Write-behind storage for warps.
///
/// Each mutation method mirrors one field-group update on the registry and
/// receives a snapshot of the warp as it looked after that update; adapters
/// persist the relevant columns from the snapshot. `list_all` is the bulk
/// read used at startup and reload, at which point no writes are pending.
///
/// Adapters must round-trip every field of [`Warp`] losslessly through
/// `add_warp` + `list_all`.
#[async_trait]
pub trait WarpStore: Send + Sync {
    /// Insert a new warp, including its invitation set.
    async fn add_warp(&self, warp: &Warp) -> StorageResult<()>;

    /// Delete a warp and everything attached to it.
    async fn remove_warp(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist a changed creator.
    async fn update_creator(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist a changed world/position/rotation triple.
    async fn update_location(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist a changed visibility kind.
    async fn update_kind(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist a changed visit count.
    async fn update_visits(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist a changed welcome message.
    async fn update_welcome_message(&self, warp: &Warp) -> StorageResult<()>;

    /// Persist one added invitation.
    async fn add_invitation(&self, warp: &Warp, invitation: &Invitation) -> StorageResult<()>;

    /// Persist one removed invitation.
    async fn remove_invitation(&self, warp: &Warp, invitation: &Invitation) -> StorageResult<()>;

    /// Read every stored warp. Startup/reload only.
    async fn list_all(&self) -> StorageResult<Vec<Warp>>;
}
