//! Group membership reconciliation
//!
//! Each status reply carries grouping fields from one player's point of
//! view, and the two sides of a link are polled at different times. The
//! reconciler merges those one-sided claims into consistent per-player
//! views: a leader learns about a follower as soon as either side reports
//! the link, so a half-reported group is resolved within one pass instead
//! of waiting for both pollers.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;
use tracing::trace;

use crate::model::{GroupView, PlayerId, StateChange};
use crate::registry::PlayerRegistry;

/// Resolves raw grouping claims into per-player [`GroupView`]s
///
/// Holds no state of its own beyond a pass lock; views live in the
/// registry and change detection compares against the previously stored
/// view there. The lock keeps passes strictly sequential so two overlapping
/// reconciliations cannot interleave their writes.
pub struct GroupReconciler {
    pass_lock: Mutex<()>,
}

impl GroupReconciler {
    /// Create a new reconciler
    pub fn new() -> Self {
        Self {
            pass_lock: Mutex::new(()),
        }
    }

    /// Run one reconciliation pass over the registry.
    ///
    /// Returns one `GroupChanged` per player whose resolved view differs
    /// from the previous pass. A pass over an unchanged topology returns
    /// nothing.
    pub fn reconcile(&self, registry: &PlayerRegistry) -> Vec<StateChange> {
        let _guard = self.pass_lock.lock();

        let players = registry.all();

        // Union both sides of every claimed link: a leader's follower list
        // and each follower's leader claim describe the same edges.
        let mut followers_of: BTreeMap<PlayerId, BTreeSet<PlayerId>> = BTreeMap::new();
        for state in &players {
            let own_id = state.get_id();
            if !state.raw_followers.is_empty() {
                followers_of
                    .entry(own_id.clone())
                    .or_default()
                    .extend(state.raw_followers.iter().cloned());
            }
            if let Some(leader) = &state.raw_leader {
                if leader != own_id {
                    followers_of
                        .entry(leader.clone())
                        .or_default()
                        .insert(own_id.clone());
                }
            }
        }

        let mut changes = Vec::new();
        for state in &players {
            let own_id = state.get_id();

            let view = if let Some(leader) = &state.raw_leader {
                if leader == own_id {
                    self.leader_view(own_id, &followers_of)
                } else {
                    GroupView {
                        leader_id: leader.clone(),
                        follower_ids: Vec::new(),
                        is_grouped: true,
                    }
                }
            } else {
                self.leader_view(own_id, &followers_of)
            };

            if let Some(change) = registry.set_group_view(own_id, view) {
                trace!(player = %own_id, "group view changed");
                changes.push(change);
            }
        }
        changes
    }

    /// The view of a player that leads its group, or stands alone
    fn leader_view(
        &self,
        own_id: &PlayerId,
        followers_of: &BTreeMap<PlayerId, BTreeSet<PlayerId>>,
    ) -> GroupView {
        let follower_ids: Vec<PlayerId> = followers_of
            .get(own_id)
            .map(|set| set.iter().filter(|f| *f != own_id).cloned().collect())
            .unwrap_or_default();
        let is_grouped = !follower_ids.is_empty();
        GroupView {
            leader_id: own_id.clone(),
            follower_ids,
            is_grouped,
        }
    }
}

impl Default for GroupReconciler {
    fn default() -> Self {
        Self::new()
    }
}
