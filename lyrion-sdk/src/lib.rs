//! # Lyrion SDK - Player monitoring and control for Lyrion Music Server
//!
//! Connects to one Lyrion Music Server (LMS) over its JSON-RPC endpoint,
//! tracks the players it serves and exposes typed handles for controlling
//! them:
//!
//! ```rust,no_run
//! use lyrion_sdk::{Config, LyrionSystem, StateChange};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lyrion_sdk::SdkError> {
//!     let system = LyrionSystem::new(Config::load()?)?;
//!     system.connect().await?;
//!
//!     if let Some(kitchen) = system.player_by_name("Kitchen") {
//!         kitchen.set_volume(40).await?;
//!         kitchen.play().await?;
//!     }
//!
//!     let mut changes = system.changes().expect("first take");
//!     while let Some(change) = changes.recv().await {
//!         if let StateChange::TrackChanged { player_id, new_track, .. } = change {
//!             println!("{player_id}: {new_track:?}");
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Key behaviors
//!
//! - **Restore-first startup**: `connect()` rebuilds the tracked roster
//!   from the persisted [`Config`] and starts polling immediately, even if
//!   the server is down. Discovery is a separate, explicit call.
//! - **Poll-driven state**: one adaptive poller per player feeds a shared
//!   registry; consumers see discrete [`StateChange`] events instead of
//!   raw status payloads.
//! - **Resilient by default**: unreachable players back off and keep being
//!   probed; they are marked unavailable, never dropped.
//!
//! ## Architecture
//!
//! ```text
//! lyrion-sdk    (system, config, player/group handles)
//!     ↓
//! lyrion-poll   (per-player adaptive polling)
//!     ↓
//! lyrion-state  (registry, group reconciliation, change events)
//!     ↓
//! lyrion-api    (typed commands, status parsing)
//!     ↓
//! rpc-client    (JSON-RPC transport)
//! ```

mod config;
mod error;
mod group;
mod player;
mod system;

pub use config::{Config, ConfigError, PlayerEntry};
pub use error::SdkError;
pub use group::Group;
pub use player::Player;
pub use system::{InitState, LyrionSystem};

// Re-exports of the types that appear in this crate's API surface.
pub use lyrion_api::{
    ApiError, ContentKind, Favorite, PlaybackState, PlayerCommand, RepeatMode, TrackSection,
};
pub use lyrion_state::{GroupView, PlayerId, PlayerState, StateChange};
