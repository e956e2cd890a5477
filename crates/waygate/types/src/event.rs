//! Domain events published after registry mutations
//!
//! Every successful mutation on an eventful registry produces exactly one of
//! these. Events are informational: subscribers (dynmap-style renderers,
//! audit sinks) may react, but nothing in the core depends on them.

use crate::invitation::Invitation;
use crate::warp::Warp;
use serde::{Deserialize, Serialize};

/// Field group touched by an update event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarpField {
    Creator,
    Location,
    Kind,
    Visits,
    WelcomeMessage,
}

/// Direction of an invitation change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvitationChange {
    Added,
    Removed,
}

/// A mutation notification, carrying a snapshot of the affected warp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum WarpEvent {
    Added { warp: Warp },
    Removed { warp: Warp },
    Updated { field: WarpField, warp: Warp },
    InvitationChanged {
        change: InvitationChange,
        invitation: Invitation,
        warp: Warp,
    },
}

impl WarpEvent {
    /// Name of the affected warp, for logging and filtering.
    pub fn warp_name(&self) -> &str {
        match self {
            WarpEvent::Added { warp }
            | WarpEvent::Removed { warp }
            | WarpEvent::Updated { warp, .. }
            | WarpEvent::InvitationChanged { warp, .. } => &warp.name,
        }
    }
}
