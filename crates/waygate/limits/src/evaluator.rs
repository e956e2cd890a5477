//! Quota evaluation against the live registry
//!
//! The enforcer never holds the registry; callers pass it in by reference at
//! each check, so every count reflects the registry as it is right now.
//! Counting is always scoped to the actor's own warps in the worlds a limit
//! governs — cross-actor counts are never computed here.

use crate::limit::{Limit, LimitProvider};
use crate::value::LimitValue;
use std::sync::Arc;
use tracing::debug;
use waygate_registry::WarpRegistry;
use waygate_types::{PlayerId, Warp, WarpKind, WorldId};

/// Outcome of a quota check
///
/// A miss is a result, not an error; callers decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// All applicable values are under their maxima.
    Ok,
    /// The first value (in [`LimitValue::EVALUATION_ORDER`]) found at or
    /// over its maximum.
    Exceeded { value: LimitValue, maximum: u32 },
}

impl Evaluation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Evaluation::Ok)
    }
}

/// Quota checks backed by a [`LimitProvider`]
pub struct LimitEnforcer {
    provider: Arc<dyn LimitProvider>,
}

impl LimitEnforcer {
    pub fn new(provider: Arc<dyn LimitProvider>) -> Self {
        Self { provider }
    }

    /// May `actor` create one more warp of `kind` in `world`?
    ///
    /// Checks every value applicable to `kind`, in evaluation order; the
    /// first exceeded value wins. Values the actor may disobey, and values
    /// with no configured maximum, are skipped before any counting.
    pub fn evaluate_add<R>(
        &self,
        registry: &R,
        actor: &PlayerId,
        world: &WorldId,
        kind: WarpKind,
    ) -> Evaluation
    where
        R: WarpRegistry + ?Sized,
    {
        let limit = self.provider.limit_for(actor, world);
        self.evaluate(registry, actor, world, limit.as_ref(), |value| {
            value.covers_kind(kind)
        })
    }

    /// May `actor` switch a warp in `world` from `old_kind` to `new_kind`?
    ///
    /// Only values applicable to `new_kind` that do not already count
    /// `old_kind` are checked: the warp already occupies its slot in any
    /// value covering both kinds (`Total`, in particular), and changing the
    /// kind does not change membership for those.
    pub fn evaluate_kind_change<R>(
        &self,
        registry: &R,
        actor: &PlayerId,
        world: &WorldId,
        old_kind: WarpKind,
        new_kind: WarpKind,
    ) -> Evaluation
    where
        R: WarpRegistry + ?Sized,
    {
        let limit = self.provider.limit_for(actor, world);
        self.evaluate(registry, actor, world, limit.as_ref(), |value| {
            value.covers_kind(new_kind) && !value.covers_kind(old_kind)
        })
    }

    /// Live per-limit views of everything `actor` owns, one entry for each
    /// limit that could govern them.
    pub fn assets<'r, R>(&self, registry: &'r R, actor: &PlayerId) -> Vec<LimitAssets<'r, R>>
    where
        R: WarpRegistry + ?Sized,
    {
        self.provider
            .effective_limits(actor)
            .into_iter()
            .map(|limit| LimitAssets {
                registry,
                limit,
                actor: *actor,
            })
            .collect()
    }

    fn evaluate<R>(
        &self,
        registry: &R,
        actor: &PlayerId,
        world: &WorldId,
        limit: &dyn Limit,
        applicable: impl Fn(LimitValue) -> bool,
    ) -> Evaluation
    where
        R: WarpRegistry + ?Sized,
    {
        for value in LimitValue::EVALUATION_ORDER {
            if !applicable(value) {
                continue;
            }
            if limit.can_disobey(actor, world, value) {
                continue;
            }
            let Some(maximum) = limit.maximum(value) else {
                continue;
            };

            let count = count_owned(registry, actor, limit, value);
            debug!(actor = %actor, %value, count, maximum, "quota check");
            if count as u64 >= u64::from(maximum) {
                return Evaluation::Exceeded { value, maximum };
            }
        }
        Evaluation::Ok
    }
}

fn count_owned<R>(registry: &R, actor: &PlayerId, limit: &dyn Limit, value: LimitValue) -> usize
where
    R: WarpRegistry + ?Sized,
{
    registry.count(&|warp: &Warp| {
        warp.creator == *actor && limit.governs(&warp.world) && value.covers(warp)
    })
}

/// Uncached view of one actor's warps under one limit
///
/// Borrowing the registry keeps the view live by construction: every call
/// recomputes against current contents.
pub struct LimitAssets<'r, R: ?Sized> {
    registry: &'r R,
    limit: Arc<dyn Limit>,
    actor: PlayerId,
}

impl<'r, R> LimitAssets<'r, R>
where
    R: WarpRegistry + ?Sized,
{
    pub fn limit(&self) -> &dyn Limit {
        self.limit.as_ref()
    }

    /// How many of the actor's warps currently count toward `value`.
    pub fn count(&self, value: LimitValue) -> usize {
        count_owned(self.registry, &self.actor, self.limit.as_ref(), value)
    }

    /// The warps themselves, for listings.
    pub fn warps(&self, value: LimitValue) -> Vec<&'r Warp> {
        let actor = self.actor;
        let limit = Arc::clone(&self.limit);
        self.registry.query(&move |warp: &Warp| {
            warp.creator == actor && limit.governs(&warp.world) && value.covers(warp)
        })
    }
}
