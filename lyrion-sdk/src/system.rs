//! LyrionSystem - Main entry point for the SDK
//!
//! Owns the client, the registry, the favorites cache and one poller per
//! tracked player, and hands out cheap handles for everything else.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use lyrion_api::{ApiError, Favorite, LyrionClient, StatusReport};
use lyrion_poll::{PollPolicy, PollerTask, StatusSource, DEFAULT_SHUTDOWN_GRACE};
use lyrion_state::{
    FavoritesCache, GroupReconciler, PlayerId, PlayerRegistry, StateChange,
};

use crate::{Config, Group, Player, PlayerEntry, SdkError};

/// Main system entry point
///
/// Startup is restore-first: `connect()` seeds the registry from the
/// persisted configuration and starts polling without any discovery round
/// trip, so a restart comes back up even while the server is unreachable.
/// Discovery runs only when explicitly requested.
///
/// # Example
///
/// ```rust,ignore
/// use lyrion_sdk::{Config, LyrionSystem};
///
/// #[tokio::main]
/// async fn main() -> Result<(), lyrion_sdk::SdkError> {
///     let system = LyrionSystem::new(Config::load()?)?;
///     system.connect().await?;
///
///     let mut changes = system.changes().expect("first take");
///     while let Some(change) = changes.recv().await {
///         println!("{:?}", change);
///     }
///     Ok(())
/// }
/// ```
pub struct LyrionSystem {
    config: RwLock<Config>,
    client: LyrionClient,
    registry: PlayerRegistry,
    reconciler: Arc<GroupReconciler>,
    favorites: FavoritesCache,
    policy: PollPolicy,

    /// One task per tracked player; guarded by an async lock because
    /// shutdown awaits the tasks while holding it.
    pollers: tokio::sync::Mutex<HashMap<PlayerId, PollerTask>>,

    /// Held for the whole of initialization, so concurrent `connect()`
    /// calls collapse into one attempt and later ones see the result.
    init: tokio::sync::Mutex<InitState>,

    change_tx: mpsc::UnboundedSender<StateChange>,
    change_rx: Mutex<Option<mpsc::UnboundedReceiver<StateChange>>>,
}

/// Initialization lifecycle of a [`LyrionSystem`]
///
/// Advances strictly forward under one lock; `shutdown` is the only way
/// back to `Uninitialized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// Nothing restored yet
    Uninitialized,
    /// One initialization attempt is in flight
    Initializing,
    /// Restored and polling
    Ready,
}

/// Adapts the typed client to the poller's fetch seam
struct ClientSource {
    client: LyrionClient,
}

#[async_trait]
impl StatusSource for ClientSource {
    async fn fetch_status(&self, player_id: &PlayerId) -> Result<StatusReport, ApiError> {
        self.client.player_status(player_id.as_str()).await
    }
}

impl LyrionSystem {
    /// Create a system for the given configuration.
    ///
    /// Fails with [`SdkError::NotConfigured`] when no server address is
    /// set; nothing else is validated until `connect()`.
    pub fn new(config: Config) -> Result<Self, SdkError> {
        if !config.is_configured() {
            return Err(SdkError::NotConfigured);
        }

        let client = LyrionClient::new(&config.server_host, config.server_port);
        let policy = PollPolicy::with_base_interval(std::time::Duration::from_secs(
            config.poll_interval_secs.max(1),
        ));
        let (change_tx, change_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config: RwLock::new(config),
            client,
            registry: PlayerRegistry::new(),
            reconciler: Arc::new(GroupReconciler::new()),
            favorites: FavoritesCache::new(),
            policy,
            pollers: tokio::sync::Mutex::new(HashMap::new()),
            init: tokio::sync::Mutex::new(InitState::Uninitialized),
            change_tx,
            change_rx: Mutex::new(Some(change_rx)),
        })
    }

    /// Bring the system up from persisted state.
    ///
    /// Idempotent: repeated and concurrent calls initialize at most once.
    /// Restores the tracked players from configuration and starts their
    /// pollers without any discovery call; the favorites listing is loaded
    /// opportunistically and its failure does not fail startup.
    pub async fn connect(&self) -> Result<(), SdkError> {
        let mut init = self.init.lock().await;
        if *init == InitState::Ready {
            debug!("already initialized, nothing to do");
            return Ok(());
        }
        *init = InitState::Initializing;

        let entries: Vec<_> = self
            .config
            .read()
            .enabled_players()
            .cloned()
            .collect();
        info!(players = entries.len(), "restoring tracked players");
        self.apply_roster(entries).await;

        match self.client.favorites().await {
            Ok(favorites) => self.favorites.replace(favorites),
            Err(err) => warn!(error = %err, "favorites unavailable at startup"),
        }

        *init = InitState::Ready;
        Ok(())
    }

    /// Where the system is in its initialization lifecycle
    pub async fn init_state(&self) -> InitState {
        *self.init.lock().await
    }

    /// Swap in a new configuration and reconcile the tracked roster.
    ///
    /// Players dropped from the roster or disabled are removed from the
    /// registry and their pollers stopped, with `PlayerRemoved` emitted;
    /// newly enabled entries start polling. The server address is fixed at
    /// construction and is not re-read. Before `connect()` this only
    /// replaces the stored configuration; the restore picks it up.
    pub async fn reload_config(&self, config: Config) -> Result<(), SdkError> {
        if !config.is_configured() {
            return Err(SdkError::NotConfigured);
        }

        let init = self.init.lock().await;
        let entries: Vec<_> = config.enabled_players().cloned().collect();
        *self.config.write() = config;
        if *init != InitState::Ready {
            return Ok(());
        }

        info!(players = entries.len(), "reloading configuration");
        self.apply_roster(entries).await;
        Ok(())
    }

    /// Align the registry and poller set with the given roster: retire
    /// everything outside it, add and start polling everything in it.
    async fn apply_roster(&self, entries: Vec<PlayerEntry>) {
        let keep: HashSet<PlayerId> =
            entries.iter().map(|e| PlayerId::new(&e.id)).collect();
        for id in self.registry.ids() {
            if !keep.contains(&id) {
                self.retire_player(&id).await;
            }
        }

        for entry in entries {
            let player =
                lyrion_state::Player::new(entry.id.as_str(), &entry.name, &entry.model);
            let id = player.id.clone();
            if let Some(change) = self.registry.add_player(player) {
                let _ = self.change_tx.send(change);
            }
            self.start_poller(id).await;
        }
    }

    /// Stop a player's poller and drop it from the registry
    async fn retire_player(&self, id: &PlayerId) {
        let task = self.pollers.lock().await.remove(id);
        if let Some(task) = task {
            task.shutdown(DEFAULT_SHUTDOWN_GRACE).await;
        }
        if let Some(change) = self.registry.remove_player(id) {
            debug!(player = %id, "player retired");
            let _ = self.change_tx.send(change);
        }
    }

    /// Ask the server for its player list and start tracking the results.
    ///
    /// The server's list is authoritative: newly seen players are
    /// remembered in the in-memory configuration as enabled, players the
    /// operator disabled stay untracked, and tracked players the server no
    /// longer reports are retired with `PlayerRemoved`. Call
    /// [`save_config`](Self::save_config) to persist the updated roster.
    pub async fn discover(&self) -> Result<Vec<Player>, SdkError> {
        let infos = self.client.players().await?;

        let mut handles = Vec::new();
        let mut kept = HashSet::new();
        for info in infos {
            let enabled = {
                let mut config = self.config.write();
                config.remember_player(&info.id, &info.name, &info.model);
                config
                    .players
                    .iter()
                    .find(|p| p.id.eq_ignore_ascii_case(&info.id))
                    .map(|p| p.enabled)
                    .unwrap_or(true)
            };
            if !enabled {
                debug!(player = %info.id, "skipping disabled player");
                continue;
            }

            let player = lyrion_state::Player::new(info.id.as_str(), &info.name, &info.model);
            let id = player.id.clone();
            kept.insert(id.clone());
            if let Some(change) = self.registry.add_player(player) {
                let _ = self.change_tx.send(change);
            }
            self.start_poller(id.clone()).await;

            if let Some(handle) = self.player(&id) {
                handles.push(handle);
            }
        }

        for id in self.registry.ids() {
            if !kept.contains(&id) {
                self.retire_player(&id).await;
            }
        }
        Ok(handles)
    }

    async fn start_poller(&self, id: PlayerId) {
        let mut pollers = self.pollers.lock().await;
        if pollers.contains_key(&id) {
            return;
        }
        let source = Arc::new(ClientSource {
            client: self.client.clone(),
        });
        let task = PollerTask::start(
            id.clone(),
            source,
            self.registry.clone(),
            self.reconciler.clone(),
            self.policy,
            self.change_tx.clone(),
        );
        pollers.insert(id, task);
    }

    /// Stop all pollers and return to the uninitialized state.
    ///
    /// Bounded: tasks that do not wind down within the grace period are
    /// abandoned along with their in-flight requests.
    pub async fn shutdown(&self) {
        let mut init = self.init.lock().await;
        let tasks: Vec<_> = self.pollers.lock().await.drain().collect();
        info!(pollers = tasks.len(), "shutting down");
        for (_, task) in tasks {
            task.shutdown(DEFAULT_SHUTDOWN_GRACE).await;
        }
        *init = InitState::Uninitialized;
    }

    /// Take the change event stream.
    ///
    /// There is one stream per system; the first caller gets it and later
    /// calls return `None`.
    pub fn changes(&self) -> Option<mpsc::UnboundedReceiver<StateChange>> {
        self.change_rx.lock().take()
    }

    /// Handle for one tracked player
    pub fn player(&self, id: &PlayerId) -> Option<Player> {
        let state = self.registry.get(id)?;
        Some(self.make_handle(&state.player))
    }

    /// Handle for a tracked player looked up by display name
    pub fn player_by_name(&self, name: &str) -> Option<Player> {
        self.registry
            .all()
            .into_iter()
            .find(|state| state.player.name == name)
            .map(|state| self.make_handle(&state.player))
    }

    /// Handles for every tracked player
    pub fn players(&self) -> Vec<Player> {
        self.registry
            .all()
            .iter()
            .map(|state| self.make_handle(&state.player))
            .collect()
    }

    /// All resolved multi-player groups
    pub fn groups(&self) -> Vec<Group> {
        self.registry
            .all()
            .into_iter()
            .filter(|state| {
                state.group.is_grouped && state.group.leads(state.get_id())
            })
            .map(|leader_state| {
                let followers = leader_state
                    .group
                    .follower_ids
                    .iter()
                    .filter_map(|id| self.player(id))
                    .collect();
                Group {
                    leader: self.make_handle(&leader_state.player),
                    followers,
                }
            })
            .collect()
    }

    /// The group a player belongs to, if it is grouped
    pub fn group_for(&self, id: &PlayerId) -> Option<Group> {
        let view = self.registry.get(id)?.group;
        if !view.is_grouped {
            return None;
        }
        self.groups()
            .into_iter()
            .find(|group| group.leader.id == view.leader_id)
    }

    /// The favorites listing truncated to the surfaced slot count
    pub fn favorites(&self) -> Vec<Favorite> {
        self.favorites.surface()
    }

    /// The complete favorites listing
    pub fn all_favorites(&self) -> Arc<Vec<Favorite>> {
        self.favorites.snapshot()
    }

    /// Re-fetch the favorites listing from the server
    pub async fn refresh_favorites(&self) -> Result<(), SdkError> {
        let favorites = self.client.favorites().await?;
        self.favorites.replace(favorites);
        Ok(())
    }

    /// Query the server version (also serves as a reachability probe)
    pub async fn server_version(&self) -> Result<String, SdkError> {
        Ok(self.client.server_version().await?)
    }

    /// A snapshot of the current configuration
    pub fn config(&self) -> Config {
        self.config.read().clone()
    }

    /// Persist the current configuration to its default location
    pub fn save_config(&self) -> Result<(), SdkError> {
        Ok(self.config.read().save()?)
    }

    /// The underlying typed client, for operations the system does not wrap
    pub fn client(&self) -> &LyrionClient {
        &self.client
    }

    /// Number of running poller tasks
    pub async fn active_poller_count(&self) -> usize {
        self.pollers.lock().await.len()
    }

    fn make_handle(&self, player: &lyrion_state::Player) -> Player {
        Player::new(
            player.id.clone(),
            player.name.clone(),
            player.model.clone(),
            self.client.clone(),
            self.registry.clone(),
            self.change_tx.clone(),
            self.config.read().artwork_enabled,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    const A: &str = "aa:aa:aa:aa:aa:01";
    const B: &str = "aa:aa:aa:aa:aa:02";

    fn rpc_result(result: serde_json::Value) -> String {
        json!({ "id": 1, "result": result }).to_string()
    }

    fn test_config(server: &mockito::ServerGuard, players: &[(&str, bool)]) -> Config {
        let addr = server.host_with_port();
        let (host, port) = addr.rsplit_once(':').unwrap();
        let mut config = Config::for_server(host, port.parse().unwrap());
        for (id, enabled) in players {
            config.players.push(PlayerEntry {
                id: id.to_string(),
                name: format!("Player {id}"),
                model: "Squeezebox Radio".to_string(),
                enabled: *enabled,
            });
        }
        config
    }

    /// Swallows poller status calls so they succeed quietly.
    async fn mock_status_catch_all(server: &mut mockito::ServerGuard) {
        server
            .mock("POST", "/jsonrpc.js")
            .with_body(rpc_result(json!({})))
            .create_async()
            .await;
    }

    /// Status reply for one player, discriminated by the addressed id.
    /// Later registrations override earlier ones for the same player.
    async fn mock_player_status(
        server: &mut mockito::ServerGuard,
        player: &str,
        result: serde_json::Value,
    ) {
        server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": [player, ["status", "-", "1", "tags:Aaltdc"]],
            })))
            .with_body(rpc_result(result))
            .create_async()
            .await;
    }

    async fn mock_empty_favorites(server: &mut mockito::ServerGuard) {
        server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["favorites", "items", "0", "100"]],
            })))
            .with_body(rpc_result(json!({ "loop_loop": [] })))
            .create_async()
            .await;
    }

    #[test]
    fn test_unconfigured_is_rejected() {
        let result = LyrionSystem::new(Config::default());
        assert!(matches!(result, Err(SdkError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_connect_restores_without_discovery() {
        let mut server = mockito::Server::new_async().await;
        mock_status_catch_all(&mut server).await;
        mock_empty_favorites(&mut server).await;
        // Restore must not trigger a discovery round trip.
        let discovery = server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["players", "0", "999"]],
            })))
            .expect(0)
            .create_async()
            .await;

        let config = test_config(&server, &[(A, true), (B, true), ("cc:cc:cc:cc:cc:03", false)]);
        let system = LyrionSystem::new(config).unwrap();
        system.connect().await.unwrap();

        assert_eq!(system.active_poller_count().await, 2);
        assert_eq!(system.players().len(), 2);
        assert!(system.player(&PlayerId::new("cc:cc:cc:cc:cc:03")).is_none());
        discovery.assert_async().await;

        system.shutdown().await;
        assert_eq!(system.active_poller_count().await, 0);
    }

    #[tokio::test]
    async fn test_connect_is_idempotent() {
        let mut server = mockito::Server::new_async().await;
        // Registered before the catch-all so the catch-all cannot swallow
        // the favorites request if it arrives before any status poll.
        let favorites = server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["favorites", "items", "0", "100"]],
            })))
            .with_body(rpc_result(json!({ "loop_loop": [] })))
            .expect(1)
            .create_async()
            .await;
        mock_status_catch_all(&mut server).await;

        let system = LyrionSystem::new(test_config(&server, &[(A, true)])).unwrap();
        assert_eq!(system.init_state().await, InitState::Uninitialized);

        // Concurrent and repeated calls collapse into one initialization.
        let (first, second) = tokio::join!(system.connect(), system.connect());
        first.unwrap();
        second.unwrap();
        system.connect().await.unwrap();

        assert_eq!(system.init_state().await, InitState::Ready);
        assert_eq!(system.active_poller_count().await, 1);
        favorites.assert_async().await;

        system.shutdown().await;
        assert_eq!(system.init_state().await, InitState::Uninitialized);
    }

    #[tokio::test]
    async fn test_connect_tolerates_missing_favorites() {
        let mut server = mockito::Server::new_async().await;
        mock_status_catch_all(&mut server).await;
        server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["favorites", "items", "0", "100"]],
            })))
            .with_status(500)
            .create_async()
            .await;

        let system = LyrionSystem::new(test_config(&server, &[(A, true)])).unwrap();
        system.connect().await.unwrap();

        assert!(system.favorites().is_empty());
        assert_eq!(system.active_poller_count().await, 1);
        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_discover_adds_players_and_pollers() {
        let mut server = mockito::Server::new_async().await;
        // Registered before the catch-all: mockito serves the earliest
        // created mock that is still short of its expected hits, so a
        // catch-all created first would swallow the discovery request.
        server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["players", "0", "999"]],
            })))
            .with_body(rpc_result(json!({
                "players_loop": [
                    { "playerid": A, "name": "Kitchen", "modelname": "Squeezebox Radio", "connected": 1 },
                    { "playerid": B, "name": "Den", "modelname": "Squeezebox Boom", "connected": 1 },
                ]
            })))
            .create_async()
            .await;
        mock_status_catch_all(&mut server).await;

        let system = LyrionSystem::new(test_config(&server, &[])).unwrap();
        let discovered = system.discover().await.unwrap();

        assert_eq!(discovered.len(), 2);
        assert_eq!(system.active_poller_count().await, 2);
        assert_eq!(system.config().players.len(), 2);
        assert!(system.player_by_name("Kitchen").is_some());
        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_reload_config_retires_dropped_players() {
        let mut server = mockito::Server::new_async().await;
        mock_status_catch_all(&mut server).await;
        mock_empty_favorites(&mut server).await;

        let system =
            LyrionSystem::new(test_config(&server, &[(A, true), (B, true)])).unwrap();
        let mut changes = system.changes().unwrap();
        system.connect().await.unwrap();
        assert_eq!(system.active_poller_count().await, 2);

        let shrunk = test_config(&server, &[(A, true)]);
        system.reload_config(shrunk).await.unwrap();

        assert_eq!(system.players().len(), 1);
        assert!(system.player(&PlayerId::new(B)).is_none());
        assert_eq!(system.active_poller_count().await, 1);
        assert_eq!(system.config().players.len(), 1);

        let mut saw_removed = false;
        while let Ok(change) = changes.try_recv() {
            if matches!(
                &change,
                StateChange::PlayerRemoved { player_id } if *player_id == PlayerId::new(B)
            ) {
                saw_removed = true;
            }
        }
        assert!(saw_removed);

        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_discover_retires_players_unknown_to_server() {
        let mut server = mockito::Server::new_async().await;
        mock_status_catch_all(&mut server).await;
        mock_empty_favorites(&mut server).await;
        // The server only knows about A now.
        server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": ["", ["players", "0", "999"]],
            })))
            .with_body(rpc_result(json!({
                "players_loop": [
                    { "playerid": A, "name": "Kitchen", "modelname": "Squeezebox Radio", "connected": 1 },
                ]
            })))
            .create_async()
            .await;

        let system =
            LyrionSystem::new(test_config(&server, &[(A, true), (B, true)])).unwrap();
        system.connect().await.unwrap();
        assert_eq!(system.players().len(), 2);

        system.discover().await.unwrap();

        assert_eq!(system.players().len(), 1);
        assert!(system.player(&PlayerId::new(B)).is_none());
        assert_eq!(system.active_poller_count().await, 1);

        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_group_appears_from_polled_status() {
        let mut server = mockito::Server::new_async().await;
        mock_empty_favorites(&mut server).await;
        mock_player_status(&mut server, A, json!({ "sync_slaves": B })).await;
        mock_player_status(&mut server, B, json!({ "sync_master": A })).await;

        let system = LyrionSystem::new(test_config(&server, &[(A, true), (B, true)])).unwrap();
        let mut changes = system.changes().unwrap();
        system.connect().await.unwrap();

        // First polls fire immediately; give them a moment to land.
        tokio::time::sleep(Duration::from_millis(300)).await;

        let groups = system.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].leader.id, PlayerId::new(A));
        assert_eq!(groups[0].followers.len(), 1);
        assert_eq!(groups[0].followers[0].id, PlayerId::new(B));

        let group = system.group_for(&PlayerId::new(B)).unwrap();
        assert!(group.contains(&PlayerId::new(A)));

        let mut saw_group_change = false;
        while let Ok(change) = changes.try_recv() {
            if matches!(change, StateChange::GroupChanged { .. }) {
                saw_group_change = true;
            }
        }
        assert!(saw_group_change);

        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_join_and_leave_reshape_groups() {
        const C: &str = "aa:aa:aa:aa:aa:04";
        let mut server = mockito::Server::new_async().await;
        mock_empty_favorites(&mut server).await;
        let solo = json!({ "mode": "play", "power": 1 });
        for id in [A, B, C] {
            mock_player_status(&mut server, id, solo.clone()).await;
        }

        let mut config = test_config(&server, &[(A, true), (B, true), (C, true)]);
        config.poll_interval_secs = 1;
        let system = LyrionSystem::new(config).unwrap();
        system.connect().await.unwrap();

        let b = system.player(&PlayerId::new(B)).unwrap();
        let c = system.player(&PlayerId::new(C)).unwrap();

        // B joins A; subsequent polls report the link from both sides.
        let sync_b = server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": [B, ["sync", A]],
            })))
            .with_body(rpc_result(json!({})))
            .create_async()
            .await;
        mock_player_status(
            &mut server,
            A,
            json!({ "mode": "play", "power": 1, "sync_slaves": B }),
        )
        .await;
        mock_player_status(
            &mut server,
            B,
            json!({ "mode": "play", "power": 1, "sync_master": A }),
        )
        .await;

        b.join(&PlayerId::new(A)).await.unwrap();
        sync_b.assert_async().await;
        tokio::time::sleep(Duration::from_millis(1600)).await;

        let group = system.group_for(&PlayerId::new(A)).unwrap();
        assert_eq!(group.leader.id, PlayerId::new(A));
        assert_eq!(group.followers.len(), 1);
        assert!(group.contains(&PlayerId::new(B)));

        // C joins the same group.
        let sync_c = server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": [C, ["sync", A]],
            })))
            .with_body(rpc_result(json!({})))
            .create_async()
            .await;
        mock_player_status(
            &mut server,
            A,
            json!({ "mode": "play", "power": 1, "sync_slaves": format!("{},{}", B, C) }),
        )
        .await;
        mock_player_status(
            &mut server,
            C,
            json!({ "mode": "play", "power": 1, "sync_master": A }),
        )
        .await;

        c.join(&PlayerId::new(A)).await.unwrap();
        sync_c.assert_async().await;
        tokio::time::sleep(Duration::from_millis(1600)).await;

        let group = system.group_for(&PlayerId::new(A)).unwrap();
        assert_eq!(group.followers.len(), 2);
        assert!(group.contains(&PlayerId::new(B)));
        assert!(group.contains(&PlayerId::new(C)));

        // B leaves; A keeps leading C.
        let unsync_b = server
            .mock("POST", "/jsonrpc.js")
            .match_body(mockito::Matcher::PartialJson(json!({
                "params": [B, ["sync", "-"]],
            })))
            .with_body(rpc_result(json!({})))
            .create_async()
            .await;
        mock_player_status(
            &mut server,
            A,
            json!({ "mode": "play", "power": 1, "sync_slaves": C }),
        )
        .await;
        mock_player_status(&mut server, B, solo.clone()).await;

        b.leave().await.unwrap();
        unsync_b.assert_async().await;
        tokio::time::sleep(Duration::from_millis(1600)).await;

        assert!(system.group_for(&PlayerId::new(B)).is_none());
        let group = system.group_for(&PlayerId::new(A)).unwrap();
        assert_eq!(group.followers.len(), 1);
        assert!(group.contains(&PlayerId::new(C)));

        system.shutdown().await;
    }

    #[tokio::test]
    async fn test_changes_stream_taken_once() {
        let server = mockito::Server::new_async().await;
        let system = LyrionSystem::new(test_config(&server, &[])).unwrap();
        assert!(system.changes().is_some());
        assert!(system.changes().is_none());
    }
}
