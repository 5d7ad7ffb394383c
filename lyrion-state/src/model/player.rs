//! Player device information type

use super::PlayerId;
use serde::{Deserialize, Serialize};

/// Identity of a player managed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Stable hardware identifier
    pub id: PlayerId,
    /// Display name
    pub name: String,
    /// Model name (e.g. "Squeezebox Radio")
    pub model: String,
}

impl Player {
    /// Create a player identity
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            model: model.into(),
        }
    }

    /// Get the player ID
    pub fn get_id(&self) -> &PlayerId {
        &self.id
    }
}
