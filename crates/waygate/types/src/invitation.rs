//! Invitations to private warps
//!
//! An invitation is an opaque matcher: either a single player or a named
//! permission group. Whether a concrete player falls under a group is the
//! host server's business, reached through the [`Invitee`] port.

use crate::ids::PlayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An entry in a warp's invitation set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Invitation {
    /// Invites one player by identity
    Player(PlayerId),
    /// Invites every member of a permission group
    Group(String),
}

impl Invitation {
    /// Tests whether `invitee` is covered by this invitation.
    pub fn covers(&self, invitee: &dyn Invitee) -> bool {
        match self {
            Invitation::Player(id) => invitee.id() == *id,
            Invitation::Group(group) => invitee.in_group(group),
        }
    }
}

impl fmt::Display for Invitation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Invitation::Player(id) => write!(f, "{id}"),
            Invitation::Group(group) => write!(f, "group:{group}"),
        }
    }
}

/// Adapter over whoever is asking for access
///
/// Implemented by the host server's player wrapper; group membership lives
/// in its permission system, not here.
pub trait Invitee {
    fn id(&self) -> PlayerId;
    fn in_group(&self, group: &str) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestInvitee {
        id: PlayerId,
        groups: Vec<String>,
    }

    impl Invitee for TestInvitee {
        fn id(&self) -> PlayerId {
            self.id
        }

        fn in_group(&self, group: &str) -> bool {
            self.groups.iter().any(|g| g == group)
        }
    }

    #[test]
    fn player_invitation_matches_identity_only() {
        let invited = PlayerId::generate();
        let other = PlayerId::generate();
        let invitation = Invitation::Player(invited);

        let yes = TestInvitee {
            id: invited,
            groups: vec![],
        };
        let no = TestInvitee {
            id: other,
            groups: vec![],
        };

        assert!(invitation.covers(&yes));
        assert!(!invitation.covers(&no));
    }

    #[test]
    fn group_invitation_delegates_membership() {
        let invitation = Invitation::Group("mods".to_string());
        let member = TestInvitee {
            id: PlayerId::generate(),
            groups: vec!["mods".to_string()],
        };
        let outsider = TestInvitee {
            id: PlayerId::generate(),
            groups: vec!["builders".to_string()],
        };

        assert!(invitation.covers(&member));
        assert!(!invitation.covers(&outsider));
    }
}
