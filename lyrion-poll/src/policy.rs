//! Interval and backoff policy
//!
//! Pure functions so the timing rules can be tested without spinning up
//! tasks. The loop in `task.rs` is just plumbing around these.

use std::time::Duration;

use lyrion_state::PlayerState;

/// Poll cadence for an actively playing player
pub const DEFAULT_BASE_INTERVAL: Duration = Duration::from_secs(2);

/// Poll cadence for everything else (paused, stopped, powered off)
pub const DEFAULT_IDLE_INTERVAL: Duration = Duration::from_secs(10);

/// Upper bound on the error backoff delay
pub const DEFAULT_BACKOFF_CAP: Duration = Duration::from_secs(60);

/// Timing knobs for one poller task
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    /// Interval while the player is playing
    pub base_interval: Duration,
    /// Interval while the player is idle
    pub idle_interval: Duration,
    /// Cap on exponential error backoff
    pub backoff_cap: Duration,
}

impl PollPolicy {
    /// Policy with the given base interval and default idle/backoff knobs.
    ///
    /// The idle interval never drops below the base interval.
    pub fn with_base_interval(base_interval: Duration) -> Self {
        Self {
            base_interval,
            idle_interval: DEFAULT_IDLE_INTERVAL.max(base_interval),
            backoff_cap: DEFAULT_BACKOFF_CAP,
        }
    }

    /// The delay before the next poll given the player's current state.
    ///
    /// A playing player is polled at the base cadence so position and track
    /// changes surface quickly; anything else only changes in response to
    /// commands or rare external events and gets the idle cadence. An
    /// unknown player gets the base cadence until its first report lands.
    pub fn next_interval(&self, state: Option<&PlayerState>) -> Duration {
        match state {
            Some(state) if !state.is_playing() => self.idle_interval,
            _ => self.base_interval,
        }
    }

    /// The delay before the next poll after `failures` consecutive errors.
    ///
    /// Doubles from the base interval per failure and saturates at the cap,
    /// so an unreachable player keeps being probed forever at a gentle
    /// cadence instead of being given up on.
    pub fn backoff_delay(&self, failures: u32) -> Duration {
        if failures == 0 {
            return self.base_interval;
        }
        let exponent = failures.saturating_sub(1).min(16);
        self.base_interval
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.backoff_cap)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            base_interval: DEFAULT_BASE_INTERVAL,
            idle_interval: DEFAULT_IDLE_INTERVAL,
            backoff_cap: DEFAULT_BACKOFF_CAP,
        }
    }
}
