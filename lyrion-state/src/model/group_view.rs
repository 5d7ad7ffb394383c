//! Resolved group membership view

use super::PlayerId;
use serde::{Deserialize, Serialize};

/// One player's resolved group membership
///
/// Derived from the raw leader/follower fields the server embeds in status
/// replies; recomputed on every reconciliation pass, never stored as
/// mutable back-references. An ungrouped player is its own leader with an
/// empty follower set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupView {
    /// Identifier of the group leader; the player's own id when ungrouped
    pub leader_id: PlayerId,
    /// Followers mirroring this player; empty unless this player leads
    pub follower_ids: Vec<PlayerId>,
    /// Whether the player is part of a multi-player group
    pub is_grouped: bool,
}

impl GroupView {
    /// The view of an ungrouped player
    pub fn solo(id: PlayerId) -> Self {
        Self {
            leader_id: id,
            follower_ids: Vec::new(),
            is_grouped: false,
        }
    }

    /// Whether this player leads its group
    pub fn leads(&self, own_id: &PlayerId) -> bool {
        self.leader_id == *own_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solo_is_own_leader() {
        let id = PlayerId::new("aa:bb:cc:dd:ee:ff");
        let view = GroupView::solo(id.clone());
        assert_eq!(view.leader_id, id);
        assert!(view.follower_ids.is_empty());
        assert!(!view.is_grouped);
        assert!(view.leads(&id));
    }

    #[test]
    fn test_follower_does_not_lead() {
        let leader = PlayerId::new("aa:aa:aa:aa:aa:aa");
        let follower = PlayerId::new("bb:bb:bb:bb:bb:bb");
        let view = GroupView {
            leader_id: leader,
            follower_ids: Vec::new(),
            is_grouped: true,
        };
        assert!(!view.leads(&follower));
    }
}
