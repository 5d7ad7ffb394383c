//! Player identity type

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable hardware identifier of a player
///
/// This is the MAC address the server uses to address players, normalized
/// to lowercase for consistent comparison (the server is case-insensitive
/// but not case-consistent across endpoints).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// Creates a new PlayerId, normalizing to lowercase
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        PlayerId::new(s)
    }
}

impl From<String> for PlayerId {
    fn from(s: String) -> Self {
        PlayerId::new(s)
    }
}
