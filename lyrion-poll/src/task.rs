//! Per-player polling task
//!
//! One task per tracked player, each with its own cadence and failure
//! state, so a dead player backing off never delays a healthy one. Cycles
//! within a task are strictly sequential: the next fetch is not started
//! until the previous one resolved and its report was merged.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use lyrion_state::{GroupReconciler, PlayerId, PlayerRegistry, StateChange};

use crate::policy::PollPolicy;
use crate::source::StatusSource;

/// How long `shutdown` waits for a task to wind down before abandoning it
pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// A running polling loop for one player
///
/// The loop never gives up on a player: errors back off exponentially up
/// to the policy cap and keep probing until shutdown. It exits only on
/// shutdown signal or when the change channel has no receiver left.
pub struct PollerTask {
    player_id: PlayerId,
    shutdown_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl PollerTask {
    /// Spawn the polling loop for one player.
    ///
    /// The first fetch happens immediately so freshly added players show
    /// real state without waiting out an interval.
    pub fn start(
        player_id: PlayerId,
        source: Arc<dyn StatusSource>,
        registry: PlayerRegistry,
        reconciler: Arc<GroupReconciler>,
        policy: PollPolicy,
        change_tx: mpsc::UnboundedSender<StateChange>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let task_id = player_id.clone();
        let handle = tokio::spawn(async move {
            Self::polling_loop(
                task_id,
                source,
                registry,
                reconciler,
                policy,
                change_tx,
                shutdown_rx,
            )
            .await;
        });

        Self {
            player_id,
            shutdown_tx,
            handle,
        }
    }

    async fn polling_loop(
        player_id: PlayerId,
        source: Arc<dyn StatusSource>,
        registry: PlayerRegistry,
        reconciler: Arc<GroupReconciler>,
        policy: PollPolicy,
        change_tx: mpsc::UnboundedSender<StateChange>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) {
        debug!(player = %player_id, "poller started");
        let mut failures: u32 = 0;

        loop {
            // A shutdown mid-fetch drops the in-flight call on the floor
            // rather than waiting out a slow or dead server.
            let outcome = tokio::select! {
                _ = shutdown_rx.changed() => break,
                outcome = source.fetch_status(&player_id) => outcome,
            };

            let delay = match outcome {
                Ok(report) => {
                    failures = 0;
                    let mut changes = registry.apply_report(&player_id, &report);
                    changes.extend(reconciler.reconcile(&registry));
                    for change in changes {
                        if change_tx.send(change).is_err() {
                            debug!(player = %player_id, "change channel closed, poller exiting");
                            return;
                        }
                    }
                    policy.next_interval(registry.get(&player_id).as_ref())
                }
                Err(err) => {
                    failures = failures.saturating_add(1);
                    warn!(player = %player_id, failures, error = %err, "status poll failed");
                    if let Some(change) = registry.record_failure(&player_id) {
                        if change_tx.send(change).is_err() {
                            return;
                        }
                    }
                    policy.backoff_delay(failures)
                }
            };

            tokio::select! {
                _ = shutdown_rx.changed() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }
        debug!(player = %player_id, "poller stopped");
    }

    /// The player this task polls
    pub fn player_id(&self) -> &PlayerId {
        &self.player_id
    }

    /// Whether the loop is still running
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stop the loop, waiting at most `grace` for it to wind down.
    ///
    /// Returns `true` if the task exited within the grace period. A task
    /// stuck in a transport call past the deadline is aborted and
    /// abandoned; player state is poll-derived, so nothing needs flushing.
    pub async fn shutdown(self, grace: Duration) -> bool {
        let _ = self.shutdown_tx.send(true);
        match tokio::time::timeout(grace, self.handle).await {
            Ok(_) => true,
            Err(_) => {
                info!(player = %self.player_id, "poller did not stop in time, abandoning");
                false
            }
        }
    }
}
