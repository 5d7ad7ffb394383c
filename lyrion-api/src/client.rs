//! Typed client for executing LMS operations
//!
//! Bridges the typed command/status layer and the raw JSON-RPC transport.
//! One client per server endpoint; players are addressed per call by their
//! hardware identifier.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, info};

use rpc_client::RpcClient;

use crate::command::PlayerCommand;
use crate::error::Result;
use crate::favorites::{parse_favorites_page, Favorite};
use crate::status::{StatusReport, STATUS_TAGS};

/// Folder recursion limit for favorites flattening. Deeper nesting is
/// ignored rather than treated as an error.
const MAX_FOLDER_DEPTH: usize = 3;

/// Page size for server-global listings (players, favorites levels)
const LISTING_PAGE_SIZE: &str = "100";

/// A player known to the server, as reported by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerInfo {
    /// Stable hardware identifier (MAC address)
    pub id: String,
    /// Display name
    pub name: String,
    /// Model name
    pub model: String,
    /// Whether the player is currently connected to the server
    pub connected: bool,
}

/// A client for executing typed operations against one LMS instance
///
/// Cheap to clone; all clones share the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct LyrionClient {
    rpc: Arc<RpcClient>,
}

impl LyrionClient {
    /// Create a client for the given server address
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            rpc: Arc::new(RpcClient::new(host, port)),
        }
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        Self {
            rpc: Arc::new(RpcClient::with_timeout(host, port, timeout)),
        }
    }

    /// Query the server version (also serves as a reachability probe)
    pub async fn server_version(&self) -> Result<String> {
        let result = self.rpc.call(None, &["version", "?"]).await?;
        Ok(result
            .get("_version")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string())
    }

    /// Query the raw server status document (version, player counts,
    /// library totals). Kept untyped; callers pick the fields they need.
    pub async fn server_status(&self) -> Result<Value> {
        Ok(self
            .rpc
            .call(None, &["serverstatus", "0", LISTING_PAGE_SIZE])
            .await?)
    }

    /// List all players the server knows about
    pub async fn players(&self) -> Result<Vec<PlayerInfo>> {
        let result = self.rpc.call(None, &["players", "0", "999"]).await?;

        let players: Vec<PlayerInfo> = result
            .get("players_loop")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let id = entry.get("playerid").and_then(Value::as_str)?;
                        Some(PlayerInfo {
                            id: id.to_string(),
                            name: entry
                                .get("name")
                                .and_then(Value::as_str)
                                .unwrap_or("Unknown Player")
                                .to_string(),
                            model: entry
                                .get("modelname")
                                .and_then(Value::as_str)
                                .unwrap_or("unknown")
                                .to_string(),
                            connected: entry
                                .get("connected")
                                .and_then(Value::as_u64)
                                .unwrap_or(0)
                                != 0,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        info!(count = players.len(), "discovered players");
        Ok(players)
    }

    /// Query one player's current status
    pub async fn player_status(&self, player_id: &str) -> Result<StatusReport> {
        let tags = format!("tags:{}", STATUS_TAGS);
        let result = self
            .rpc
            .call(Some(player_id), &["status", "-", "1", &tags])
            .await?;
        Ok(StatusReport::from_value(&result))
    }

    /// Send a typed control command to one player.
    ///
    /// Encoding errors are returned before any network call.
    pub async fn send(&self, player_id: &str, command: &PlayerCommand) -> Result<()> {
        let tokens = command.encode()?;
        let token_refs: Vec<&str> = tokens.iter().map(String::as_str).collect();
        debug!(player = player_id, ?tokens, "sending command");
        self.rpc.call(Some(player_id), &token_refs).await?;
        Ok(())
    }

    /// Load the full favorites tree, flattened into a single ordered
    /// sequence. Folder entries contribute their children in place, with
    /// the folder names recorded as each child's path.
    pub async fn favorites(&self) -> Result<Vec<Favorite>> {
        let mut favorites = Vec::new();
        self.collect_favorites(None, Vec::new(), &mut favorites)
            .await?;
        info!(count = favorites.len(), "loaded favorites");
        Ok(favorites)
    }

    fn collect_favorites<'a>(
        &'a self,
        folder_id: Option<String>,
        path: Vec<String>,
        out: &'a mut Vec<Favorite>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let mut command = vec!["favorites", "items", "0", LISTING_PAGE_SIZE];
            let folder_token = folder_id.as_ref().map(|id| format!("item_id:{}", id));
            if let Some(token) = folder_token.as_deref() {
                command.push(token);
            }

            let result = self.rpc.call(None, &command).await?;

            for entry in parse_favorites_page(&result) {
                if entry.has_children {
                    if path.len() < MAX_FOLDER_DEPTH {
                        let mut child_path = path.clone();
                        child_path.push(entry.name.clone());
                        self.collect_favorites(Some(entry.id), child_path, out)
                            .await?;
                    }
                } else {
                    out.push(Favorite {
                        id: entry.id,
                        name: entry.name,
                        kind: entry.kind,
                        path: path.clone(),
                    });
                }
            }
            Ok(())
        })
    }

    /// List server-side sync groups as member-identifier sets
    pub async fn sync_groups(&self) -> Result<Vec<Vec<String>>> {
        let result = self.rpc.call(None, &["syncgroups", "?"]).await?;

        let groups = result
            .get("syncgroups_loop")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|entry| {
                        let members = entry.get("sync_members").and_then(Value::as_str)?;
                        Some(
                            members
                                .split(',')
                                .filter(|m| !m.is_empty())
                                .map(str::to_string)
                                .collect::<Vec<_>>(),
                        )
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(groups)
    }

    /// Build the artwork URL for a cover reference, or the player's
    /// current-track artwork when no reference is known
    pub fn artwork_url(&self, player_id: &str, coverid: Option<&str>) -> String {
        match coverid {
            Some(coverid) => {
                format!("{}/music/{}/cover.jpg", self.rpc.base_url(), coverid)
            }
            None => format!(
                "{}/music/current/cover.jpg?player={}",
                self.rpc.base_url(),
                player_id
            ),
        }
    }
}
