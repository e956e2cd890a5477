//! The registry trait

use crate::error::Result;
use waygate_types::{Invitation, PlayerId, Position, Rotation, Warp, WarpKind, WorldId};

/// Name-keyed warp collection with a decorator-visible mutation surface.
///
/// Reads are answered from memory and reflect state at call time; no method
/// performs I/O. Mutations take `&mut self` — whoever owns the registry owns
/// all writes to it.
///
/// Field-level changes go through the per-field-group methods rather than
/// through mutable access to a stored [`Warp`]; that is what allows wrapping
/// implementations to mirror every update into a durable store or onto an
/// event bus without missing any.
pub trait WarpRegistry {
    /// Insert a new warp. Fails with
    /// [`RegistryError::DuplicateName`](crate::RegistryError::DuplicateName)
    /// if the name is taken, leaving the existing warp untouched.
    fn add(&mut self, warp: Warp) -> Result<()>;

    /// Remove a warp by name, returning it if it was present. Removing an
    /// absent name is a no-op.
    fn remove(&mut self, name: &str) -> Option<Warp>;

    /// Look up a warp by name.
    fn get(&self, name: &str) -> Option<&Warp>;

    /// Whether a warp with this name is registered.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All warps matching `predicate`, as of call time. No snapshot
    /// guarantee beyond that.
    fn query(&self, predicate: &dyn Fn(&Warp) -> bool) -> Vec<&Warp>;

    /// Number of warps matching `predicate`, as of call time.
    fn count(&self, predicate: &dyn Fn(&Warp) -> bool) -> usize;

    /// Replace the entire contents with `batch`. An intra-batch duplicate
    /// name fails the whole call and leaves the previous contents in place.
    /// Reload plumbing: data originates from the durable store, so wrappers
    /// treat this as cache population, not as a mutation to mirror.
    fn populate(&mut self, batch: Vec<Warp>) -> Result<()>;

    /// Unconditionally clear the registry. Reload plumbing, like
    /// [`populate`](WarpRegistry::populate).
    fn depopulate(&mut self);

    /// Replace the world/position/rotation triple atomically.
    fn update_location(
        &mut self,
        name: &str,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> Result<()>;

    /// Change the visibility kind.
    fn update_kind(&mut self, name: &str, kind: WarpKind) -> Result<()>;

    /// Transfer ownership to another player.
    fn update_creator(&mut self, name: &str, creator: PlayerId) -> Result<()>;

    /// Replace the welcome message.
    fn update_welcome_message(&mut self, name: &str, message: String) -> Result<()>;

    /// Count one successful use of the warp.
    fn record_visit(&mut self, name: &str) -> Result<()>;

    /// Add an invitation. Inviting an already-invited matcher is harmless.
    fn invite(&mut self, name: &str, invitation: Invitation) -> Result<()>;

    /// Remove an invitation. Removing an absent matcher is harmless.
    fn uninvite(&mut self, name: &str, invitation: Invitation) -> Result<()>;
}
