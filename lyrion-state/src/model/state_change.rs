//! State change event types

use serde::{Deserialize, Serialize};

use lyrion_api::{PlaybackState, RepeatMode, TrackSection};

use super::{GroupView, PlayerId};

/// A state change event that consumers can react to
///
/// Emitted by the registry (field changes detected while merging a status
/// report) and the group reconciler (resolved view changes). The host
/// integration layer forwards these to its own entity notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StateChange {
    /// A player was added to the registry
    PlayerAdded {
        /// ID of the added player
        player_id: PlayerId,
    },

    /// A player was removed (only ever by explicit discovery reconciliation)
    PlayerRemoved {
        /// ID of the removed player
        player_id: PlayerId,
    },

    /// Reachability flipped (failure threshold crossed, or recovery)
    AvailabilityChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New availability
        available: bool,
    },

    /// Power state changed
    PowerChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New power state
        power: bool,
    },

    /// Playback state changed
    PlaybackChanged {
        /// Player that changed
        player_id: PlayerId,
        /// Previous playback state
        old_state: PlaybackState,
        /// New playback state
        new_state: PlaybackState,
    },

    /// Volume changed
    VolumeChanged {
        /// Player that changed
        player_id: PlayerId,
        /// Previous volume level
        old_volume: u8,
        /// New volume level
        new_volume: u8,
    },

    /// Mute state changed
    MuteChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New mute state
        muted: bool,
    },

    /// Repeat mode changed
    RepeatChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New repeat mode
        repeat: RepeatMode,
    },

    /// Shuffle flag changed
    ShuffleChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New shuffle flag
        shuffle: bool,
    },

    /// Playback position advanced or the track length changed
    PositionChanged {
        /// Player that changed
        player_id: PlayerId,
        /// New position in seconds
        elapsed_secs: u64,
        /// Track duration in seconds
        duration_secs: u64,
    },

    /// Current track changed
    TrackChanged {
        /// Player that changed
        player_id: PlayerId,
        /// Previous track (if any)
        old_track: Option<TrackSection>,
        /// New track (if any)
        new_track: Option<TrackSection>,
    },

    /// A player's resolved group view changed since the previous
    /// reconciliation pass
    GroupChanged {
        /// Player whose view changed
        player_id: PlayerId,
        /// The newly resolved view
        view: GroupView,
    },
}

impl StateChange {
    /// Get the player ID associated with this change
    pub fn player_id(&self) -> &PlayerId {
        match self {
            StateChange::PlayerAdded { player_id }
            | StateChange::PlayerRemoved { player_id }
            | StateChange::AvailabilityChanged { player_id, .. }
            | StateChange::PowerChanged { player_id, .. }
            | StateChange::PlaybackChanged { player_id, .. }
            | StateChange::VolumeChanged { player_id, .. }
            | StateChange::MuteChanged { player_id, .. }
            | StateChange::RepeatChanged { player_id, .. }
            | StateChange::ShuffleChanged { player_id, .. }
            | StateChange::PositionChanged { player_id, .. }
            | StateChange::TrackChanged { player_id, .. }
            | StateChange::GroupChanged { player_id, .. } => player_id,
        }
    }
}
