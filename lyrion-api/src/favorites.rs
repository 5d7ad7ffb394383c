//! Favorites listing types and parsing
//!
//! The server stores favorites as a shallow tree: plain playable entries and
//! folders whose children are fetched one level at a time with the folder's
//! hierarchical `item_id`. Consumers want a single ordered sequence, so the
//! client flattens the tree in source order and records each entry's folder
//! path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content-type tag of a favorite entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    /// A radio stream
    Radio,
    /// A saved playlist
    Playlist,
    /// A single track
    Track,
    /// A whole album
    Album,
    /// An artist shortcut
    Artist,
    /// Anything the server reports that we do not classify
    Unknown,
}

impl ContentKind {
    /// Classify from the server's `type` field
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "audio" | "radio" => ContentKind::Radio,
            "playlist" => ContentKind::Playlist,
            "track" => ContentKind::Track,
            "album" => ContentKind::Album,
            "artist" => ContentKind::Artist,
            _ => ContentKind::Unknown,
        }
    }
}

/// A server-stored favorite, immutable after load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    /// Server-assigned hierarchical identifier (e.g. `ecd2e8b9.0` or `1.1`)
    pub id: String,
    /// Display label
    pub name: String,
    /// Content-type tag
    pub kind: ContentKind,
    /// Names of the enclosing folders, root first; empty for top-level entries
    pub path: Vec<String>,
}

/// One entry of a single favorites listing page, before flattening
#[derive(Debug, Clone)]
pub struct FavoritesPageEntry {
    /// Server-assigned identifier
    pub id: String,
    /// Display label
    pub name: String,
    /// Content-type tag
    pub kind: ContentKind,
    /// Whether this entry is a folder with children to fetch
    pub has_children: bool,
}

/// Parse one level of a `favorites items` reply.
///
/// Entries without an identifier are skipped; source order is preserved.
pub fn parse_favorites_page(result: &Value) -> Vec<FavoritesPageEntry> {
    let Some(entries) = result.get("loop_loop").and_then(Value::as_array) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let id = non_empty_string(entry, "id")?;
            let name = non_empty_string(entry, "name").unwrap_or_else(|| id.clone());
            let has_children = entry
                .get("hasitems")
                .and_then(Value::as_u64)
                .unwrap_or(0)
                > 0;
            let kind = entry
                .get("type")
                .and_then(Value::as_str)
                .map(ContentKind::from_type)
                .unwrap_or(ContentKind::Unknown);

            Some(FavoritesPageEntry {
                id,
                name,
                kind,
                has_children,
            })
        })
        .collect()
}

fn non_empty_string(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_page_preserves_order() {
        let result = json!({
            "loop_loop": [
                { "id": "1.0", "name": "Jazz FM", "type": "audio", "hasitems": 0 },
                { "id": "1.1", "name": "Morning Mix", "type": "playlist", "hasitems": 0 },
                { "id": "1.2", "name": "Stations", "hasitems": 1 },
            ]
        });

        let entries = parse_favorites_page(&result);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].name, "Jazz FM");
        assert_eq!(entries[0].kind, ContentKind::Radio);
        assert!(!entries[0].has_children);
        assert_eq!(entries[1].kind, ContentKind::Playlist);
        assert!(entries[2].has_children);
    }

    #[test]
    fn test_parse_page_skips_idless_entries() {
        let result = json!({
            "loop_loop": [
                { "name": "broken" },
                { "id": "2.0", "name": "Kept", "type": "track" },
            ]
        });

        let entries = parse_favorites_page(&result);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "2.0");
        assert_eq!(entries[0].kind, ContentKind::Track);
    }

    #[test]
    fn test_parse_page_empty_result() {
        assert!(parse_favorites_page(&json!({})).is_empty());
    }

    #[test]
    fn test_content_kind_classification() {
        assert_eq!(ContentKind::from_type("audio"), ContentKind::Radio);
        assert_eq!(ContentKind::from_type("playlist"), ContentKind::Playlist);
        assert_eq!(ContentKind::from_type("album"), ContentKind::Album);
        assert_eq!(ContentKind::from_type("artist"), ContentKind::Artist);
        assert_eq!(ContentKind::from_type("whatever"), ContentKind::Unknown);
    }

    #[test]
    fn test_name_falls_back_to_id() {
        let result = json!({ "loop_loop": [{ "id": "3.0" }] });
        let entries = parse_favorites_page(&result);
        assert_eq!(entries[0].name, "3.0");
    }
}
