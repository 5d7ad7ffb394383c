//! Thread-safe player registry with change detection
//!
//! The registry is the single writer for [`PlayerState`]. Status reports
//! merge in field by field under the shard lock for the player's key, so
//! concurrent merges for different players never block each other while
//! merges for the same player are serialized.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

use lyrion_api::StatusReport;

use crate::model::{Player, PlayerId, PlayerState, StateChange};

/// Consecutive poll failures before a player is marked unreachable
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;

/// Thread-safe registry of tracked players
///
/// Update methods return the [`StateChange`] events produced by the update,
/// empty when nothing actually changed. Merging a report never clears a
/// field the report does not mention.
pub struct PlayerRegistry {
    players: Arc<DashMap<PlayerId, PlayerState>>,
    failure_threshold: u32,
}

impl PlayerRegistry {
    /// Create a new empty registry with the default failure threshold
    pub fn new() -> Self {
        Self::with_failure_threshold(DEFAULT_FAILURE_THRESHOLD)
    }

    /// Create a registry with a custom consecutive-failure threshold
    pub fn with_failure_threshold(failure_threshold: u32) -> Self {
        Self {
            players: Arc::new(DashMap::new()),
            failure_threshold: failure_threshold.max(1),
        }
    }

    /// Add a player, returning `PlayerAdded` if it was not known before.
    ///
    /// Re-adding a known player refreshes its name and model in place and
    /// never duplicates the entry.
    pub fn add_player(&self, player: Player) -> Option<StateChange> {
        let id = player.id.clone();
        if let Some(mut existing) = self.players.get_mut(&id) {
            existing.player.name = player.name;
            existing.player.model = player.model;
            return None;
        }

        self.players.insert(id.clone(), PlayerState::new(player));
        debug!(player = %id, "player added to registry");
        Some(StateChange::PlayerAdded { player_id: id })
    }

    /// Remove a player, returning `PlayerRemoved` if it was present
    pub fn remove_player(&self, id: &PlayerId) -> Option<StateChange> {
        self.players.remove(id).map(|_| StateChange::PlayerRemoved {
            player_id: id.clone(),
        })
    }

    /// Merge a status report into a player's state.
    ///
    /// Fields absent from the report keep their stored values. Each field
    /// that actually changed value produces one event; an identical report
    /// produces none. A successful report also counts as proof of life:
    /// the failure counter resets and availability is restored if the
    /// player had been marked unreachable.
    pub fn apply_report(&self, id: &PlayerId, report: &StatusReport) -> Vec<StateChange> {
        let mut state = match self.players.get_mut(id) {
            Some(state) => state,
            None => return Vec::new(),
        };

        let mut changes = Vec::new();

        state.last_seen = Some(SystemTime::now());
        state.consecutive_failures = 0;
        if !state.available {
            state.available = true;
            changes.push(StateChange::AvailabilityChanged {
                player_id: id.clone(),
                available: true,
            });
        }

        if let Some(power) = report.power {
            if state.power != power {
                state.power = power;
                changes.push(StateChange::PowerChanged {
                    player_id: id.clone(),
                    power,
                });
            }
        }

        if let Some(playback) = report.playback {
            if state.playback != playback {
                let old_state = state.playback;
                state.playback = playback;
                changes.push(StateChange::PlaybackChanged {
                    player_id: id.clone(),
                    old_state,
                    new_state: playback,
                });
            }
        }

        if let Some(volume) = report.volume {
            if state.volume != volume {
                let old_volume = state.volume;
                state.volume = volume;
                changes.push(StateChange::VolumeChanged {
                    player_id: id.clone(),
                    old_volume,
                    new_volume: volume,
                });
            }
        }

        if let Some(muted) = report.muted {
            if state.muted != muted {
                state.muted = muted;
                changes.push(StateChange::MuteChanged {
                    player_id: id.clone(),
                    muted,
                });
            }
        }

        if let Some(repeat) = report.repeat {
            if state.repeat != repeat {
                state.repeat = repeat;
                changes.push(StateChange::RepeatChanged {
                    player_id: id.clone(),
                    repeat,
                });
            }
        }

        if let Some(shuffle) = report.shuffle {
            if state.shuffle != shuffle {
                state.shuffle = shuffle;
                changes.push(StateChange::ShuffleChanged {
                    player_id: id.clone(),
                    shuffle,
                });
            }
        }

        if report.elapsed_secs.is_some() || report.duration_secs.is_some() {
            let elapsed = report.elapsed_secs.unwrap_or(state.elapsed_secs);
            let duration = report.duration_secs.unwrap_or(state.duration_secs);

            // Position jitter under one second is not worth an event, but
            // the stored value still advances so reads stay fresh.
            let significant = (state.elapsed_secs as i64 - elapsed as i64).unsigned_abs() > 1
                || state.duration_secs != duration;

            state.elapsed_secs = elapsed;
            state.duration_secs = duration;
            if significant {
                changes.push(StateChange::PositionChanged {
                    player_id: id.clone(),
                    elapsed_secs: elapsed,
                    duration_secs: duration,
                });
            }
        }

        if let Some(section) = &report.track {
            // An empty section is the server saying "nothing loaded".
            let new_track = if section.is_empty() {
                None
            } else {
                Some(section.clone())
            };
            if state.track != new_track {
                let old_track = state.track.take();
                state.track = new_track.clone();
                changes.push(StateChange::TrackChanged {
                    player_id: id.clone(),
                    old_track,
                    new_track,
                });
            }
        }

        if let Some(grouping) = &report.grouping {
            // Raw fields only; the resolved view and its GroupChanged
            // events come from the reconciler pass.
            state.raw_leader = grouping.leader.as_deref().map(PlayerId::new);
            state.raw_followers = grouping
                .followers
                .iter()
                .map(|f| PlayerId::new(f))
                .collect();
        }

        changes
    }

    /// Record one failed poll for a player.
    ///
    /// Returns `AvailabilityChanged` exactly when the consecutive-failure
    /// count crosses the threshold. Further failures keep counting but emit
    /// nothing until a success resets them.
    pub fn record_failure(&self, id: &PlayerId) -> Option<StateChange> {
        let mut state = self.players.get_mut(id)?;
        state.consecutive_failures = state.consecutive_failures.saturating_add(1);

        if state.available && state.consecutive_failures >= self.failure_threshold {
            state.available = false;
            debug!(
                player = %id,
                failures = state.consecutive_failures,
                "player marked unreachable"
            );
            return Some(StateChange::AvailabilityChanged {
                player_id: id.clone(),
                available: false,
            });
        }
        None
    }

    /// Replace a player's resolved group view, returning `GroupChanged` if
    /// the view differs from the stored one
    pub fn set_group_view(
        &self,
        id: &PlayerId,
        view: crate::model::GroupView,
    ) -> Option<StateChange> {
        let mut state = self.players.get_mut(id)?;
        if state.group == view {
            return None;
        }
        state.group = view.clone();
        Some(StateChange::GroupChanged {
            player_id: id.clone(),
            view,
        })
    }

    /// Get a player's state by ID
    pub fn get(&self, id: &PlayerId) -> Option<PlayerState> {
        self.players.get(id).map(|state| state.clone())
    }

    /// Get all tracked player states
    pub fn all(&self) -> Vec<PlayerState> {
        self.players
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Get all tracked player IDs
    pub fn ids(&self) -> Vec<PlayerId> {
        self.players.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of tracked players
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Clone for PlayerRegistry {
    fn clone(&self) -> Self {
        Self {
            players: self.players.clone(),
            failure_threshold: self.failure_threshold,
        }
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
