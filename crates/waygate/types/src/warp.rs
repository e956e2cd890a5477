//! The warp entity and its builder
//!
//! A warp is a named teleport destination owned by a player. Its name is the
//! registry key and never changes after creation; everything else is mutated
//! through the registry surface so the decorator chain sees every update.

use crate::ids::{PlayerId, WorldId};
use crate::invitation::Invitation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Visibility class of a warp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarpKind {
    /// Usable by everyone
    Public,
    /// Usable by the creator and invited players or groups
    Private,
}

impl fmt::Display for WarpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarpKind::Public => write!(f, "public"),
            WarpKind::Private => write!(f, "private"),
        }
    }
}

/// A point in a world, in block coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A view direction, pitch and yaw in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl Rotation {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }
}

/// A named teleport destination
///
/// `name` and `created_at` are immutable after construction. `world`,
/// `position`, and `rotation` form one atomic location triple and are only
/// ever replaced together. `visits` is monotonically non-decreasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warp {
    pub name: String,
    pub creator: PlayerId,
    pub kind: WarpKind,
    pub world: WorldId,
    pub position: Position,
    pub rotation: Rotation,
    pub created_at: DateTime<Utc>,
    pub visits: u32,
    pub welcome_message: String,
    pub invitations: HashSet<Invitation>,
}

impl Warp {
    /// Start building a warp from its required fields.
    pub fn builder(
        name: impl Into<String>,
        creator: PlayerId,
        kind: WarpKind,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> WarpBuilder {
        WarpBuilder::new(name, creator, kind, world, position, rotation)
    }
}

/// Builder for [`Warp`]
///
/// Command-time creation uses the defaults; bulk import overrides
/// `created_at`, `visits`, and the rest from stored rows.
#[derive(Debug, Clone)]
pub struct WarpBuilder {
    name: String,
    creator: PlayerId,
    kind: WarpKind,
    world: WorldId,
    position: Position,
    rotation: Rotation,
    created_at: Option<DateTime<Utc>>,
    visits: u32,
    welcome_message: String,
    invitations: HashSet<Invitation>,
}

impl WarpBuilder {
    pub fn new(
        name: impl Into<String>,
        creator: PlayerId,
        kind: WarpKind,
        world: WorldId,
        position: Position,
        rotation: Rotation,
    ) -> Self {
        Self {
            name: name.into(),
            creator,
            kind,
            world,
            position,
            rotation,
            created_at: None,
            visits: 0,
            welcome_message: String::new(),
            invitations: HashSet::new(),
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_visits(mut self, visits: u32) -> Self {
        self.visits = visits;
        self
    }

    pub fn with_welcome_message(mut self, message: impl Into<String>) -> Self {
        self.welcome_message = message.into();
        self
    }

    pub fn with_invitation(mut self, invitation: Invitation) -> Self {
        self.invitations.insert(invitation);
        self
    }

    pub fn with_invitations(mut self, invitations: impl IntoIterator<Item = Invitation>) -> Self {
        self.invitations.extend(invitations);
        self
    }

    pub fn build(self) -> Warp {
        Warp {
            name: self.name,
            creator: self.creator,
            kind: self.kind,
            world: self.world,
            position: self.position,
            rotation: self.rotation,
            created_at: self.created_at.unwrap_or_else(Utc::now),
            visits: self.visits,
            welcome_message: self.welcome_message,
            invitations: self.invitations,
        }
    }
}
