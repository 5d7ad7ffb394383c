//! Persistent configuration
//!
//! The server has no push channel to announce itself, so the set of
//! tracked players is part of configuration: a restart restores the last
//! known roster from disk without touching the network, and discovery only
//! runs when explicitly requested.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Default JSON-RPC port of a Lyrion server
pub const DEFAULT_SERVER_PORT: u16 = 9000;

/// Default base poll interval in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("no configuration directory available")]
    NoConfigDir,
}

/// One tracked player as remembered across restarts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    /// Stable hardware identifier
    pub id: String,
    /// Display name at the time of discovery
    pub name: String,
    /// Model name at the time of discovery
    #[serde(default)]
    pub model: String,
    /// Whether the player should be tracked and polled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// SDK configuration, persisted as JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Server hostname or IP address; empty means not configured
    #[serde(default)]
    pub server_host: String,
    /// Server JSON-RPC port
    #[serde(default = "default_port")]
    pub server_port: u16,
    /// Base poll interval in seconds for active players
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Whether artwork URLs are exposed on player handles
    #[serde(default = "default_true")]
    pub artwork_enabled: bool,
    /// Tracked players from the last discovery
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: String::new(),
            server_port: DEFAULT_SERVER_PORT,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            artwork_enabled: true,
            players: Vec::new(),
        }
    }
}

impl Config {
    /// Minimal configuration for the given server address
    pub fn for_server(host: impl Into<String>, port: u16) -> Self {
        Self {
            server_host: host.into(),
            server_port: port,
            ..Default::default()
        }
    }

    /// The default on-disk location of the configuration file
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join("lyrion-sdk").join("config.json"))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::default_path()?)
    }

    /// Load from an explicit path.
    ///
    /// A missing file is not an error: it yields the unconfigured default,
    /// matching a first run before any setup happened.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = serde_json::from_str(&contents)?;
                debug!(path = %path.display(), "configuration loaded");
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Save to the default location
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(Self::default_path()?)
    }

    /// Save to an explicit path, creating parent directories as needed
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Whether a server address has been set
    pub fn is_configured(&self) -> bool {
        !self.server_host.is_empty()
    }

    /// The tracked players that are enabled
    pub fn enabled_players(&self) -> impl Iterator<Item = &PlayerEntry> {
        self.players.iter().filter(|p| p.enabled)
    }

    /// Remember a player, updating its name and model if already present.
    ///
    /// A previously disabled player stays disabled.
    pub fn remember_player(&mut self, id: &str, name: &str, model: &str) {
        match self.players.iter_mut().find(|p| p.id.eq_ignore_ascii_case(id)) {
            Some(entry) => {
                entry.name = name.to_string();
                entry.model = model.to_string();
            }
            None => self.players.push(PlayerEntry {
                id: id.to_lowercase(),
                name: name.to_string(),
                model: model.to_string(),
                enabled: true,
            }),
        }
    }

    /// The entry for a player, if it is remembered
    pub fn player_entry(&self, id: &str) -> Option<&PlayerEntry> {
        self.players.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    /// Drop a player from the roster. Returns whether it was present.
    pub fn forget_player(&mut self, id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| !p.id.eq_ignore_ascii_case(id));
        self.players.len() != before
    }

    /// Enable or disable tracking for a remembered player.
    /// Returns whether the player was found.
    pub fn set_player_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.players.iter_mut().find(|p| p.id.eq_ignore_ascii_case(id)) {
            Some(entry) => {
                entry.enabled = enabled;
                true
            }
            None => false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    DEFAULT_SERVER_PORT
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_SECS
}
