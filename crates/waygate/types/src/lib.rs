//! Waygate domain types
//!
//! This crate defines the warp entity and everything that travels with it:
//!
//! - **Warp**: a named, owned teleport destination with a world position
//! - **Invitation**: opaque matchers granting access to private warps
//! - **WarpEvent**: the tagged union published after registry mutations
//! - **popularity**: the decayed-visit ordering used by listing callers
//!
//! Types here carry no behavior beyond their own data; the registry,
//! storage, and limit crates build on top of them.

#![deny(unsafe_code)]

pub mod event;
pub mod ids;
pub mod invitation;
pub mod popularity;
pub mod warp;

// Re-exports
pub use event::{InvitationChange, WarpEvent, WarpField};
pub use ids::{PlayerId, WorldId};
pub use invitation::{Invitation, Invitee};
pub use warp::{Position, Rotation, Warp, WarpBuilder, WarpKind};
