//! Player handle
//!
//! A cheap, cloneable view over one tracked player: reads come from the
//! shared registry, writes go through the command encoder to the server.
//! Commands with a predictable outcome update the registry optimistically
//! so consumers see the effect immediately; the next poll confirms or
//! corrects it.

use tokio::sync::mpsc;
use tracing::debug;

use lyrion_api::{
    LyrionClient, PlayerCommand, PlaybackState, RepeatMode, StatusReport,
};
use lyrion_state::{PlayerId, PlayerRegistry, PlayerState, StateChange};

use crate::SdkError;

/// Handle for one player
#[derive(Clone)]
pub struct Player {
    /// Stable hardware identifier
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Model name
    pub model: String,

    client: LyrionClient,
    registry: PlayerRegistry,
    change_tx: mpsc::UnboundedSender<StateChange>,
    artwork_enabled: bool,
}

impl Player {
    pub(crate) fn new(
        id: PlayerId,
        name: String,
        model: String,
        client: LyrionClient,
        registry: PlayerRegistry,
        change_tx: mpsc::UnboundedSender<StateChange>,
        artwork_enabled: bool,
    ) -> Self {
        Self {
            id,
            name,
            model,
            client,
            registry,
            change_tx,
            artwork_enabled,
        }
    }

    /// The current tracked state, if the player is still registered
    pub fn state(&self) -> Option<PlayerState> {
        self.registry.get(&self.id)
    }

    /// Whether the player is currently reachable
    pub fn is_available(&self) -> bool {
        self.state().map(|s| s.available).unwrap_or(false)
    }

    /// Send a typed command to this player.
    ///
    /// Rejected commands (out-of-range volume, empty identifiers) fail
    /// before any network call. On success, commands with a predictable
    /// outcome are applied to the local state immediately.
    pub async fn send(&self, command: PlayerCommand) -> Result<(), SdkError> {
        self.client.send(self.id.as_str(), &command).await?;

        if let Some(report) = optimistic_report(&command) {
            debug!(player = %self.id, ?command, "applying optimistic update");
            for change in self.registry.apply_report(&self.id, &report) {
                let _ = self.change_tx.send(change);
            }
        }
        Ok(())
    }

    /// Start playback
    pub async fn play(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Play).await
    }

    /// Pause playback
    pub async fn pause(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Pause).await
    }

    /// Toggle between play and pause
    pub async fn toggle_play_pause(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::TogglePlayPause).await
    }

    /// Stop playback
    pub async fn stop(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Stop).await
    }

    /// Skip to the next playlist entry
    pub async fn next_track(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::NextTrack).await
    }

    /// Go back to the previous playlist entry
    pub async fn previous_track(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::PreviousTrack).await
    }

    /// Power the player on
    pub async fn power_on(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::PowerOn).await
    }

    /// Power the player off
    pub async fn power_off(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::PowerOff).await
    }

    /// Set absolute volume, 0-100
    pub async fn set_volume(&self, volume: u8) -> Result<(), SdkError> {
        self.send(PlayerCommand::SetVolume(volume)).await
    }

    /// Raise volume by a step
    pub async fn volume_up(&self, step: u8) -> Result<(), SdkError> {
        self.send(PlayerCommand::VolumeUp(step)).await
    }

    /// Lower volume by a step
    pub async fn volume_down(&self, step: u8) -> Result<(), SdkError> {
        self.send(PlayerCommand::VolumeDown(step)).await
    }

    /// Mute the player
    pub async fn mute(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Mute).await
    }

    /// Unmute the player
    pub async fn unmute(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Unmute).await
    }

    /// Seek to an absolute position in seconds
    pub async fn seek(&self, position_secs: u64) -> Result<(), SdkError> {
        self.send(PlayerCommand::Seek(position_secs)).await
    }

    /// Set the playlist repeat mode
    pub async fn set_repeat(&self, mode: RepeatMode) -> Result<(), SdkError> {
        self.send(PlayerCommand::SetRepeat(mode)).await
    }

    /// Enable or disable playlist shuffle
    pub async fn set_shuffle(&self, enabled: bool) -> Result<(), SdkError> {
        self.send(PlayerCommand::SetShuffle(enabled)).await
    }

    /// Set a sleep timer; zero minutes cancels a pending timer
    pub async fn sleep_timer(&self, minutes: u32) -> Result<(), SdkError> {
        self.send(PlayerCommand::SleepTimer { minutes }).await
    }

    /// Play a server-stored favorite by its identifier
    pub async fn play_favorite(&self, item_id: &str) -> Result<(), SdkError> {
        self.send(PlayerCommand::PlayFavorite {
            item_id: item_id.to_string(),
        })
        .await
    }

    /// Join the group led by (or containing) the target player
    pub async fn join(&self, target: &PlayerId) -> Result<(), SdkError> {
        self.send(PlayerCommand::Sync {
            target: target.to_string(),
        })
        .await
    }

    /// Leave the current group
    pub async fn leave(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::Unsync).await
    }

    /// Clear the current playlist
    pub async fn clear_playlist(&self) -> Result<(), SdkError> {
        self.send(PlayerCommand::PlaylistClear).await
    }

    /// Artwork URL for the current track, if artwork is enabled.
    ///
    /// Falls back to the server's current-track endpoint when no cover
    /// reference is known.
    pub fn artwork_url(&self) -> Option<String> {
        if !self.artwork_enabled {
            return None;
        }
        let coverid = self
            .state()
            .and_then(|s| s.track)
            .and_then(|t| t.coverid);
        Some(
            self.client
                .artwork_url(self.id.as_str(), coverid.as_deref()),
        )
    }
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("model", &self.model)
            .finish()
    }
}

/// The partial report a command predictably produces, if any.
///
/// Toggles and relative steps depend on state the server owns, so they get
/// no optimistic update and wait for the next poll instead.
fn optimistic_report(command: &PlayerCommand) -> Option<StatusReport> {
    let mut report = StatusReport::default();
    match command {
        PlayerCommand::Play => report.playback = Some(PlaybackState::Playing),
        PlayerCommand::Pause => report.playback = Some(PlaybackState::Paused),
        PlayerCommand::Stop => report.playback = Some(PlaybackState::Stopped),
        PlayerCommand::PowerOn => report.power = Some(true),
        PlayerCommand::PowerOff => report.power = Some(false),
        PlayerCommand::SetVolume(volume) => report.volume = Some(*volume),
        PlayerCommand::Mute => report.muted = Some(true),
        PlayerCommand::Unmute => report.muted = Some(false),
        PlayerCommand::Seek(position) => report.elapsed_secs = Some(*position),
        PlayerCommand::SetRepeat(mode) => report.repeat = Some(*mode),
        PlayerCommand::SetShuffle(enabled) => report.shuffle = Some(*enabled),
        _ => return None,
    }
    Some(report)
}
