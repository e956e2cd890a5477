//! Quota policy ports
//!
//! Limits are configured and resolved by the host server (permissions,
//! per-world config); waygate only asks questions of them.

use crate::value::LimitValue;
use std::sync::Arc;
use waygate_types::{PlayerId, WorldId};

/// One quota configuration, scoped to a set of worlds
pub trait Limit: Send + Sync {
    /// Whether warps in `world` count toward this limit.
    fn governs(&self, world: &WorldId) -> bool;

    /// Maximum number of warps for `value`, or `None` for unbounded.
    fn maximum(&self, value: LimitValue) -> Option<u32>;

    /// Whether `actor` may exceed this limit's `value` in `world`
    /// (typically an admin-style permission).
    fn can_disobey(&self, actor: &PlayerId, world: &WorldId, value: LimitValue) -> bool;
}

/// Resolves which limits apply to an actor
pub trait LimitProvider: Send + Sync {
    /// The limit governing `actor`'s warps in `world`.
    fn limit_for(&self, actor: &PlayerId, world: &WorldId) -> Arc<dyn Limit>;

    /// Every limit that could govern `actor`, across all worlds the
    /// provider associates with them.
    fn effective_limits(&self, actor: &PlayerId) -> Vec<Arc<dyn Limit>>;
}
