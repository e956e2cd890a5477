//! The plain in-memory registry

use crate::error::{RegistryError, Result};
use crate::registry::WarpRegistry;
use std::collections::HashMap;
use waygate_types::{Invitation, PlayerId, Position, Rotation, Warp, WarpKind, WorldId};

/// Name-keyed in-memory warp map
///
/// This is the innermost layer of every registry stack: it holds the data
/// and enforces the uniqueness invariant, nothing else.
#[derive(Debug, Default)]
pub struct MemoryWarpRegistry {
    warps: HashMap<String, Warp>,
}

impl MemoryWarpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.warps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warps.is_empty()
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Warp> {
        self.warps
            .get_mut(name)
            .ok_or_else(|| RegistryError::UnknownName(name.to_string()))
    }
}

impl WarpRegistry for MemoryWarpRegistry {
    fn add(&mut self, warp: Warp) -> Result<()> {
        if self.warps.contains_key(&warp.name) {
            return Err(RegistryError::DuplicateName(warp.name));
        }
        self.warps.insert(warp.name.clone(), warp);
        Ok(())
    }

    fn remove(&mut self, name: &str) -> Option<Warp> {
        self.warps.remove(name)
    }

    fn get(&self, name: &str) -> Option<&Warp> {
        self.warps.get(name)
    }

    fn query(&self, predicate: &dyn Fn(&Warp) -> bool) -> Vec<&Warp> {
        self.warps.values().filter(|w| predicate(w)).collect()
    }

    fn count(&self, predicate: &dyn Fn(&Warp) -> bool) -> usize {
        self.warps.values().filter(|w| predicate(w)).count()
    }

    fn populate(&mut self, batch: Vec<Warp>) -> Result<()> {
        // Validate the whole batch before touching the map, so a duplicate
        // cannot leave a half-applied mix of old and new contents.
        let mut fresh = HashMap::with_capacity(batch.len());
        for warp in batch {
            if fresh.contains_key(&warp.name) {
                return Err(RegistryError::DuplicateName(warp.name));
            }
            fresh.insert(warp.name.clone(), warp);
        }
        self.warps = fresh;
        Ok(())
    }

    fn depopulate(&mut self) {
        self.warps.clear();
    }

    fn update_location(
        &mut self,
        name: &str,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> Result<()> {
        let warp = self.get_mut(name)?;
        warp.world = world;
        warp.position = position;
        warp.rotation = rotation;
        Ok(())
    }

    fn update_kind(&mut self, name: &str, kind: WarpKind) -> Result<()> {
        self.get_mut(name)?.kind = kind;
        Ok(())
    }

    fn update_creator(&mut self, name: &str, creator: PlayerId) -> Result<()> {
        self.get_mut(name)?.creator = creator;
        Ok(())
    }

    fn update_welcome_message(&mut self, name: &str, message: String) -> Result<()> {
        self.get_mut(name)?.welcome_message = message;
        Ok(())
    }

    fn record_visit(&mut self, name: &str) -> Result<()> {
        let warp = self.get_mut(name)?;
        warp.visits = warp.visits.saturating_add(1);
        Ok(())
    }

    fn invite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.get_mut(name)?.invitations.insert(invitation);
        Ok(())
    }

    fn uninvite(&mut self, name: &str, invitation: Invitation) -> Result<()> {
        self.get_mut(name)?.invitations.remove(&invitation);
        Ok(())
    }
}
