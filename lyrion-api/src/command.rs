//! Typed player commands and their wire encodings
//!
//! LMS commands are positional token vectors, with one notable exception:
//! favorite playback takes a single colon-joined `item_id:<id>` token rather
//! than two separate tokens. Sending the identifier as its own token makes
//! the server fault, so that encoding is a named, tested responsibility here
//! instead of inline formatting at call sites.

use crate::error::{ApiError, Result};
use crate::status::RepeatMode;

/// Prefix for the favorite playback token
const FAVORITE_KEY: &str = "item_id";

/// A typed control command addressed to one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Start playback
    Play,
    /// Pause playback
    Pause,
    /// Toggle between play and pause (bare `pause` on the wire)
    TogglePlayPause,
    /// Stop playback
    Stop,
    /// Skip to the next playlist entry
    NextTrack,
    /// Go back to the previous playlist entry
    PreviousTrack,
    /// Power the player on
    PowerOn,
    /// Power the player off
    PowerOff,
    /// Toggle power state (bare `power` on the wire)
    TogglePower,
    /// Set absolute volume, 0-100
    SetVolume(u8),
    /// Raise volume by a relative step, 1-100
    VolumeUp(u8),
    /// Lower volume by a relative step, 1-100
    VolumeDown(u8),
    /// Mute the player
    Mute,
    /// Unmute the player
    Unmute,
    /// Toggle mute state
    ToggleMute,
    /// Seek to an absolute position in seconds
    Seek(u64),
    /// Set the playlist repeat mode
    SetRepeat(RepeatMode),
    /// Enable or disable playlist shuffle
    SetShuffle(bool),
    /// Join the group led by (or containing) the target player
    Sync { target: String },
    /// Leave the current group
    Unsync,
    /// Play a server-stored favorite by its hierarchical identifier
    PlayFavorite { item_id: String },
    /// Set a sleep timer; zero minutes cancels a pending timer
    SleepTimer { minutes: u32 },
    /// Clear the current playlist
    PlaylistClear,
    /// Append random tracks to the playlist
    AddRandomTracks(u32),
    /// Append random albums to the playlist
    AddRandomAlbums(u32),
}

impl PlayerCommand {
    /// Encode this command into the exact token vector the server expects.
    ///
    /// Pure: validation failures return `ApiError::InvalidArgument` and no
    /// network call is ever issued for a rejected command.
    pub fn encode(&self) -> Result<Vec<String>> {
        let tokens = match self {
            PlayerCommand::Play => vec!["play".into()],
            PlayerCommand::Pause => vec!["pause".into(), "1".into()],
            PlayerCommand::TogglePlayPause => vec!["pause".into()],
            PlayerCommand::Stop => vec!["stop".into()],
            PlayerCommand::NextTrack => {
                vec!["playlist".into(), "index".into(), "+1".into()]
            }
            PlayerCommand::PreviousTrack => {
                vec!["playlist".into(), "index".into(), "-1".into()]
            }
            PlayerCommand::PowerOn => vec!["power".into(), "1".into()],
            PlayerCommand::PowerOff => vec!["power".into(), "0".into()],
            PlayerCommand::TogglePower => vec!["power".into()],
            PlayerCommand::SetVolume(volume) => {
                if *volume > 100 {
                    return Err(ApiError::InvalidArgument(format!(
                        "volume {} is out of range [0, 100]",
                        volume
                    )));
                }
                vec!["mixer".into(), "volume".into(), volume.to_string()]
            }
            PlayerCommand::VolumeUp(step) => {
                validate_step(*step)?;
                vec!["mixer".into(), "volume".into(), format!("+{}", step)]
            }
            PlayerCommand::VolumeDown(step) => {
                validate_step(*step)?;
                vec!["mixer".into(), "volume".into(), format!("-{}", step)]
            }
            PlayerCommand::Mute => vec!["mixer".into(), "muting".into(), "1".into()],
            PlayerCommand::Unmute => vec!["mixer".into(), "muting".into(), "0".into()],
            PlayerCommand::ToggleMute => {
                vec!["mixer".into(), "muting".into(), "toggle".into()]
            }
            PlayerCommand::Seek(position) => vec!["time".into(), position.to_string()],
            PlayerCommand::SetRepeat(mode) => vec![
                "playlist".into(),
                "repeat".into(),
                mode.as_token().into(),
            ],
            PlayerCommand::SetShuffle(enabled) => vec![
                "playlist".into(),
                "shuffle".into(),
                if *enabled { "1" } else { "0" }.into(),
            ],
            PlayerCommand::Sync { target } => {
                if target.is_empty() {
                    return Err(ApiError::InvalidArgument(
                        "sync target must not be empty".into(),
                    ));
                }
                vec!["sync".into(), target.clone()]
            }
            PlayerCommand::Unsync => vec!["sync".into(), "-".into()],
            PlayerCommand::PlayFavorite { item_id } => {
                if item_id.is_empty() {
                    return Err(ApiError::InvalidArgument(
                        "favorite identifier must not be empty".into(),
                    ));
                }
                vec![
                    "favorites".into(),
                    "playlist".into(),
                    "play".into(),
                    favorite_play_token(item_id),
                ]
            }
            PlayerCommand::SleepTimer { minutes } => {
                vec!["sleep".into(), (u64::from(*minutes) * 60).to_string()]
            }
            PlayerCommand::PlaylistClear => vec!["playlist".into(), "clear".into()],
            PlayerCommand::AddRandomTracks(count) => vec![
                "randomplay".into(),
                "tracks".into(),
                count.to_string(),
            ],
            PlayerCommand::AddRandomAlbums(count) => vec![
                "randomplay".into(),
                "albums".into(),
                count.to_string(),
            ],
        };
        Ok(tokens)
    }
}

fn validate_step(step: u8) -> Result<()> {
    if step == 0 || step > 100 {
        return Err(ApiError::InvalidArgument(format!(
            "volume step {} is out of range [1, 100]",
            step
        )));
    }
    Ok(())
}

/// Build the colon-joined favorite playback token (`item_id:<id>`)
pub fn favorite_play_token(item_id: &str) -> String {
    format!("{}:{}", FAVORITE_KEY, item_id)
}

/// Recover the favorite identifier from a previously encoded token
///
/// Returns `None` for tokens that do not carry the `item_id` key.
pub fn parse_favorite_token(token: &str) -> Option<&str> {
    token
        .strip_prefix(FAVORITE_KEY)
        .and_then(|rest| rest.strip_prefix(':'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PlayerCommand::Play, &["play"])]
    #[case(PlayerCommand::Pause, &["pause", "1"])]
    #[case(PlayerCommand::TogglePlayPause, &["pause"])]
    #[case(PlayerCommand::Stop, &["stop"])]
    #[case(PlayerCommand::NextTrack, &["playlist", "index", "+1"])]
    #[case(PlayerCommand::PreviousTrack, &["playlist", "index", "-1"])]
    #[case(PlayerCommand::PowerOn, &["power", "1"])]
    #[case(PlayerCommand::PowerOff, &["power", "0"])]
    #[case(PlayerCommand::TogglePower, &["power"])]
    #[case(PlayerCommand::Mute, &["mixer", "muting", "1"])]
    #[case(PlayerCommand::Unmute, &["mixer", "muting", "0"])]
    #[case(PlayerCommand::ToggleMute, &["mixer", "muting", "toggle"])]
    #[case(PlayerCommand::Seek(95), &["time", "95"])]
    #[case(PlayerCommand::SetRepeat(RepeatMode::Off), &["playlist", "repeat", "0"])]
    #[case(PlayerCommand::SetRepeat(RepeatMode::One), &["playlist", "repeat", "1"])]
    #[case(PlayerCommand::SetRepeat(RepeatMode::All), &["playlist", "repeat", "2"])]
    #[case(PlayerCommand::SetShuffle(true), &["playlist", "shuffle", "1"])]
    #[case(PlayerCommand::SetShuffle(false), &["playlist", "shuffle", "0"])]
    #[case(PlayerCommand::Unsync, &["sync", "-"])]
    #[case(PlayerCommand::SleepTimer { minutes: 15 }, &["sleep", "900"])]
    #[case(PlayerCommand::SleepTimer { minutes: 0 }, &["sleep", "0"])]
    #[case(PlayerCommand::PlaylistClear, &["playlist", "clear"])]
    #[case(PlayerCommand::AddRandomTracks(10), &["randomplay", "tracks", "10"])]
    #[case(PlayerCommand::AddRandomAlbums(5), &["randomplay", "albums", "5"])]
    fn test_encodings(#[case] command: PlayerCommand, #[case] expected: &[&str]) {
        assert_eq!(command.encode().unwrap(), expected);
    }

    #[test]
    fn test_set_volume_in_range() {
        for volume in [0u8, 1, 50, 99, 100] {
            let tokens = PlayerCommand::SetVolume(volume).encode().unwrap();
            assert_eq!(tokens, vec!["mixer", "volume", &volume.to_string()]);
        }
    }

    #[test]
    fn test_set_volume_out_of_range_rejected() {
        for volume in [101u8, 150, 255] {
            let err = PlayerCommand::SetVolume(volume).encode().unwrap_err();
            assert!(matches!(err, ApiError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_volume_steps() {
        assert_eq!(
            PlayerCommand::VolumeUp(5).encode().unwrap(),
            vec!["mixer", "volume", "+5"]
        );
        assert_eq!(
            PlayerCommand::VolumeDown(5).encode().unwrap(),
            vec!["mixer", "volume", "-5"]
        );
        assert!(PlayerCommand::VolumeUp(0).encode().is_err());
        assert!(PlayerCommand::VolumeDown(101).encode().is_err());
    }

    #[test]
    fn test_sleep_timer_widens_before_scaling() {
        let tokens = PlayerCommand::SleepTimer { minutes: u32::MAX }
            .encode()
            .unwrap();
        assert_eq!(tokens[1], (u64::from(u32::MAX) * 60).to_string());
    }

    #[test]
    fn test_sync_carries_target() {
        let tokens = PlayerCommand::Sync {
            target: "aa:bb:cc:dd:ee:ff".to_string(),
        }
        .encode()
        .unwrap();
        assert_eq!(tokens, vec!["sync", "aa:bb:cc:dd:ee:ff"]);
    }

    #[test]
    fn test_sync_empty_target_rejected() {
        let err = PlayerCommand::Sync {
            target: String::new(),
        }
        .encode()
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn test_favorite_playback_single_token() {
        let tokens = PlayerCommand::PlayFavorite {
            item_id: "F123".to_string(),
        }
        .encode()
        .unwrap();

        // The identifier must ride in one colon-joined token; two separate
        // tokens are a known server-fault trigger.
        assert_eq!(tokens, vec!["favorites", "playlist", "play", "item_id:F123"]);
        assert_eq!(tokens.len(), 4);
    }

    #[test]
    fn test_favorite_token_round_trip() {
        let token = favorite_play_token("F123");
        assert_eq!(token, "item_id:F123");
        assert_eq!(parse_favorite_token(&token), Some("F123"));

        // Hierarchical folder-derived identifiers keep their dots.
        let nested = favorite_play_token("ecd2e8b9.0");
        assert_eq!(parse_favorite_token(&nested), Some("ecd2e8b9.0"));
    }

    #[test]
    fn test_parse_favorite_token_rejects_other_keys() {
        assert_eq!(parse_favorite_token("track_id:42"), None);
        assert_eq!(parse_favorite_token("item_id"), None);
        assert_eq!(parse_favorite_token("F123"), None);
    }

    #[test]
    fn test_empty_favorite_rejected() {
        let err = PlayerCommand::PlayFavorite {
            item_id: String::new(),
        }
        .encode()
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn valid_volume_encodes_to_integer_token(volume in 0u8..=100) {
                let tokens = PlayerCommand::SetVolume(volume).encode().unwrap();
                prop_assert_eq!(tokens.last().unwrap(), &volume.to_string());
            }

            #[test]
            fn favorite_token_round_trips(id in "[A-Za-z0-9.]{1,16}") {
                let token = favorite_play_token(&id);
                prop_assert_eq!(parse_favorite_token(&token), Some(id.as_str()));
            }
        }
    }
}
