//! Player status report parsing
//!
//! The status query returns a tagged field set whose members depend on the
//! requested tag letters and on what the server knows about the player at
//! that moment. Every field here is therefore optional: an absent field is
//! "unknown", never an error. Numeric fields arrive as JSON numbers or as
//! numeric strings depending on server version, so extraction goes through
//! tolerant helpers rather than serde derives.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tag letters requested with every status query: artist (uppercase A),
/// artist, album, title, duration, coverid. The parser depends on exactly
/// this set and tolerates anything extra or missing.
pub const STATUS_TAGS: &str = "Aaltdc";

/// Current playback state of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// Currently playing audio
    Playing,
    /// Playback is paused
    Paused,
    /// Playback is stopped
    Stopped,
}

impl PlaybackState {
    /// Parse from the LMS `mode` field ("play", "pause", "stop")
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "play" => PlaybackState::Playing,
            "pause" => PlaybackState::Paused,
            _ => PlaybackState::Stopped,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Stopped
    }
}

/// Playlist repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// No repeat
    Off,
    /// Repeat the current track
    One,
    /// Repeat the whole playlist
    All,
}

impl RepeatMode {
    /// The wire token for `playlist repeat`
    pub fn as_token(&self) -> &'static str {
        match self {
            RepeatMode::Off => "0",
            RepeatMode::One => "1",
            RepeatMode::All => "2",
        }
    }

    /// Parse from the numeric `playlist repeat` status field
    pub fn from_code(code: u64) -> Option<Self> {
        match code {
            0 => Some(RepeatMode::Off),
            1 => Some(RepeatMode::One),
            2 => Some(RepeatMode::All),
            _ => None,
        }
    }
}

impl Default for RepeatMode {
    fn default() -> Self {
        RepeatMode::Off
    }
}

/// Metadata for the currently loaded track
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackSection {
    /// Track title
    pub title: Option<String>,
    /// Artist name
    pub artist: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// Cover art reference, resolvable to an artwork URL
    pub coverid: Option<String>,
}

impl TrackSection {
    /// Whether the section carries any metadata at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.artist.is_none() && self.album.is_none()
    }
}

/// Raw grouping fields as reported by the server for one player
///
/// Present on every full status reply, even for ungrouped players (with an
/// empty leader and follower set). A report carrying `None` for the whole
/// section is a partial report that says nothing about grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingSection {
    /// Identifier of the group leader this player follows, if any
    pub leader: Option<String>,
    /// Identifiers of the followers mirroring this player, if it leads
    pub followers: Vec<String>,
}

impl GroupingSection {
    /// Whether the server reports this player as part of a group
    pub fn is_grouped(&self) -> bool {
        self.leader.is_some() || !self.followers.is_empty()
    }
}

/// One player's status as reported by a single status query
///
/// All fields are optional; a partial report (e.g. volume only) merges into
/// registry state without clobbering what it does not mention.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// Power state
    pub power: Option<bool>,
    /// Playback state, only meaningful while powered on
    pub playback: Option<PlaybackState>,
    /// Volume, 0-100
    pub volume: Option<u8>,
    /// Mute flag
    pub muted: Option<bool>,
    /// Repeat mode
    pub repeat: Option<RepeatMode>,
    /// Shuffle flag
    pub shuffle: Option<bool>,
    /// Elapsed position in seconds
    pub elapsed_secs: Option<u64>,
    /// Track duration in seconds
    pub duration_secs: Option<u64>,
    /// Current track metadata; `Some` on every full status reply, with an
    /// empty section when no track is loaded
    pub track: Option<TrackSection>,
    /// Grouping fields; `Some` on every full status reply
    pub grouping: Option<GroupingSection>,
}

impl StatusReport {
    /// Parse a status query `result` object into a report.
    ///
    /// Absent fields become `None`; malformed individual fields are treated
    /// the same as absent ones rather than failing the whole report.
    pub fn from_value(result: &Value) -> Self {
        // Always present on a full reply: an empty playlist means "no track
        // loaded", which must overwrite stale metadata on merge.
        let track = Some(
            result
                .get("playlist_loop")
                .and_then(Value::as_array)
                .and_then(|entries| entries.first())
                .map(|entry| TrackSection {
                    title: string_field(entry, "title"),
                    artist: string_field(entry, "artist"),
                    album: string_field(entry, "album"),
                    coverid: string_field(entry, "coverid"),
                })
                .unwrap_or_default(),
        );

        let leader = string_field(result, "sync_master");
        let followers = string_field(result, "sync_slaves")
            .map(|list| {
                list.split(',')
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        StatusReport {
            power: u64_field(result, "power").map(|p| p != 0),
            playback: string_field(result, "mode")
                .map(|mode| PlaybackState::from_mode(&mode)),
            // Muted players report volume as a negative number; the
            // magnitude is the level that unmuting restores.
            volume: i64_field(result, "mixer volume")
                .map(i64::unsigned_abs)
                .filter(|v| *v <= 100)
                .map(|v| v as u8),
            muted: u64_field(result, "mixer muting").map(|m| m != 0),
            repeat: u64_field(result, "playlist repeat").and_then(RepeatMode::from_code),
            shuffle: u64_field(result, "playlist shuffle").map(|s| s > 0),
            elapsed_secs: f64_field(result, "time").map(|t| t as u64),
            duration_secs: f64_field(result, "duration").map(|d| d as u64),
            track,
            grouping: Some(GroupingSection { leader, followers }),
        }
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    match value.get(key) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn i64_field(value: &Value, key: &str) -> Option<i64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn u64_field(value: &Value, key: &str) -> Option<u64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

fn f64_field(value: &Value, key: &str) -> Option<f64> {
    match value.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_status_parses() {
        let result = json!({
            "power": 1,
            "mode": "play",
            "mixer volume": 42,
            "mixer muting": 0,
            "playlist repeat": 2,
            "playlist shuffle": 1,
            "time": 12.7,
            "duration": 240.0,
            "playlist_loop": [{
                "title": "Blue in Green",
                "artist": "Miles Davis",
                "album": "Kind of Blue",
                "coverid": "1a2b3c4d",
            }],
            "sync_master": "aa:aa:aa:aa:aa:aa",
            "sync_slaves": "bb:bb:bb:bb:bb:bb,cc:cc:cc:cc:cc:cc",
        });

        let report = StatusReport::from_value(&result);

        assert_eq!(report.power, Some(true));
        assert_eq!(report.playback, Some(PlaybackState::Playing));
        assert_eq!(report.volume, Some(42));
        assert_eq!(report.muted, Some(false));
        assert_eq!(report.repeat, Some(RepeatMode::All));
        assert_eq!(report.shuffle, Some(true));
        assert_eq!(report.elapsed_secs, Some(12));
        assert_eq!(report.duration_secs, Some(240));

        let track = report.track.unwrap();
        assert_eq!(track.title.as_deref(), Some("Blue in Green"));
        assert_eq!(track.coverid.as_deref(), Some("1a2b3c4d"));

        let grouping = report.grouping.unwrap();
        assert_eq!(grouping.leader.as_deref(), Some("aa:aa:aa:aa:aa:aa"));
        assert_eq!(grouping.followers.len(), 2);
    }

    #[test]
    fn test_absent_fields_are_unknown_not_errors() {
        let report = StatusReport::from_value(&json!({ "power": 0 }));

        assert_eq!(report.power, Some(false));
        assert!(report.playback.is_none());
        assert!(report.volume.is_none());

        // An empty playlist parses as an empty track section, which clears
        // stale metadata on merge.
        assert!(report.track.unwrap().is_empty());

        // Grouping is always present on a full reply, here empty.
        let grouping = report.grouping.unwrap();
        assert!(grouping.leader.is_none());
        assert!(grouping.followers.is_empty());
        assert!(!grouping.is_grouped());
    }

    #[test]
    fn test_numeric_strings_tolerated() {
        let result = json!({
            "power": "1",
            "mixer volume": "35",
            "time": "18.2",
        });

        let report = StatusReport::from_value(&result);
        assert_eq!(report.power, Some(true));
        assert_eq!(report.volume, Some(35));
        assert_eq!(report.elapsed_secs, Some(18));
    }

    #[test]
    fn test_negative_volume_reports_magnitude() {
        // A muted player reports its volume negated.
        let report = StatusReport::from_value(&json!({ "mixer volume": -35 }));
        assert_eq!(report.volume, Some(35));

        let report = StatusReport::from_value(&json!({ "mixer volume": "-35" }));
        assert_eq!(report.volume, Some(35));
    }

    #[test]
    fn test_out_of_range_volume_dropped() {
        let report = StatusReport::from_value(&json!({ "mixer volume": 250 }));
        assert!(report.volume.is_none());

        let report = StatusReport::from_value(&json!({ "mixer volume": -250 }));
        assert!(report.volume.is_none());
    }

    #[test]
    fn test_unknown_repeat_code_dropped() {
        let report = StatusReport::from_value(&json!({ "playlist repeat": 7 }));
        assert!(report.repeat.is_none());
    }

    #[test]
    fn test_empty_sync_slaves_means_no_followers() {
        let report = StatusReport::from_value(&json!({ "sync_slaves": "" }));
        assert!(report.grouping.unwrap().followers.is_empty());
    }

    #[test]
    fn test_playback_state_from_mode() {
        assert_eq!(PlaybackState::from_mode("play"), PlaybackState::Playing);
        assert_eq!(PlaybackState::from_mode("pause"), PlaybackState::Paused);
        assert_eq!(PlaybackState::from_mode("stop"), PlaybackState::Stopped);
        assert_eq!(PlaybackState::from_mode("unknown"), PlaybackState::Stopped);
    }

    #[test]
    fn test_repeat_mode_tokens() {
        assert_eq!(RepeatMode::Off.as_token(), "0");
        assert_eq!(RepeatMode::One.as_token(), "1");
        assert_eq!(RepeatMode::All.as_token(), "2");
        assert_eq!(RepeatMode::from_code(2), Some(RepeatMode::All));
        assert_eq!(RepeatMode::from_code(9), None);
    }
}
