//! Type-safe LMS API for player control via JSON-RPC
//!
//! This crate owns the server's command vocabulary: typed player commands
//! with validated encodings, the status tag contract and its tolerant
//! parser, favorites listing/flattening, and a typed client over the raw
//! transport. Everything here is protocol knowledge; state tracking and
//! scheduling live in the crates above.

mod client;
mod command;
mod error;
mod favorites;
mod status;

pub use client::{LyrionClient, PlayerInfo};
pub use command::{favorite_play_token, parse_favorite_token, PlayerCommand};
pub use error::{ApiError, Result};
pub use favorites::{parse_favorites_page, ContentKind, Favorite, FavoritesPageEntry};
pub use status::{
    GroupingSection, PlaybackState, RepeatMode, StatusReport, TrackSection, STATUS_TAGS,
};

pub use rpc_client::RpcError;
