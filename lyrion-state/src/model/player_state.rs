//! Player state type

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

use lyrion_api::{PlaybackState, RepeatMode, TrackSection};

use super::{GroupView, Player, PlayerId};

/// Complete tracked state of one player
///
/// Mutated only by the registry: status refreshes merge in field by field,
/// and command dispatch may apply an optimistic update that the next poll
/// corrects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// The player identity
    pub player: Player,
    /// Whether the player is currently reachable (cleared after the
    /// consecutive-failure threshold, restored by the next success)
    pub available: bool,
    /// Power state
    pub power: bool,
    /// Current playback state
    pub playback: PlaybackState,
    /// Volume, 0-100
    pub volume: u8,
    /// Mute flag
    pub muted: bool,
    /// Repeat mode
    pub repeat: RepeatMode,
    /// Shuffle flag
    pub shuffle: bool,
    /// Elapsed position in seconds
    pub elapsed_secs: u64,
    /// Track duration in seconds
    pub duration_secs: u64,
    /// Current track metadata
    pub track: Option<TrackSection>,
    /// Leader identifier as last reported by the server, if following
    pub raw_leader: Option<PlayerId>,
    /// Follower identifiers as last reported by the server
    pub raw_followers: Vec<PlayerId>,
    /// Resolved group view from the last reconciliation pass
    pub group: GroupView,
    /// Timestamp of the last successful poll
    pub last_seen: Option<SystemTime>,
    /// Consecutive failed polls since the last success
    pub consecutive_failures: u32,
}

impl PlayerState {
    /// Create fresh state for a newly observed player
    pub fn new(player: Player) -> Self {
        let group = GroupView::solo(player.id.clone());
        Self {
            player,
            available: true,
            power: false,
            playback: PlaybackState::default(),
            volume: 0,
            muted: false,
            repeat: RepeatMode::default(),
            shuffle: false,
            elapsed_secs: 0,
            duration_secs: 0,
            track: None,
            raw_leader: None,
            raw_followers: Vec::new(),
            group,
            last_seen: None,
            consecutive_failures: 0,
        }
    }

    /// Get the player ID
    pub fn get_id(&self) -> &PlayerId {
        &self.player.id
    }

    /// Whether the player is powered on and playing
    pub fn is_playing(&self) -> bool {
        self.power && self.playback == PlaybackState::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_player() -> Player {
        Player::new("aa:bb:cc:dd:ee:ff", "Kitchen", "Squeezebox Radio")
    }

    #[test]
    fn test_new_defaults() {
        let state = PlayerState::new(create_test_player());
        assert!(state.available);
        assert!(!state.power);
        assert_eq!(state.playback, PlaybackState::Stopped);
        assert_eq!(state.volume, 0);
        assert!(state.track.is_none());
        assert!(!state.group.is_grouped);
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.last_seen.is_none());
    }

    #[test]
    fn test_is_playing_requires_power() {
        let mut state = PlayerState::new(create_test_player());
        state.playback = PlaybackState::Playing;
        assert!(!state.is_playing());

        state.power = true;
        assert!(state.is_playing());
    }
}
