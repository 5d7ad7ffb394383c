//! Core model types for player state tracking

mod group_view;
mod player;
mod player_id;
mod player_state;
mod state_change;

pub use group_view::GroupView;
pub use player::Player;
pub use player_id::PlayerId;
pub use player_state::PlayerState;
pub use state_change::StateChange;
