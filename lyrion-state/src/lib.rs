//! Player state tracking for a Lyrion Music Server
//!
//! Holds the authoritative local picture of every tracked player and turns
//! polled status reports into discrete change events.
//!
//! # Architecture
//!
//! ```text
//! StatusReport → PlayerRegistry → StateChange events
//!                      ↓
//!               GroupReconciler → GroupChanged events
//! ```
//!
//! The [`PlayerRegistry`] merges reports field by field and emits a
//! [`StateChange`] per field that actually changed, so consumers only hear
//! about real transitions. Raw grouping claims from individual players are
//! resolved into consistent [`GroupView`]s by the [`GroupReconciler`].
//! The [`FavoritesCache`] keeps the rarely-changing favorites listing out
//! of the poll path.

mod favorites_cache;
mod model;
mod reconciler;
mod registry;

pub use favorites_cache::{FavoritesCache, MAX_SURFACE_SLOTS};
pub use model::{GroupView, Player, PlayerId, PlayerState, StateChange};
pub use reconciler::GroupReconciler;
pub use registry::{PlayerRegistry, DEFAULT_FAILURE_THRESHOLD};
