//! Adaptive status polling for Lyrion players
//!
//! The server has no push channel worth relying on, so state is pulled:
//! one [`PollerTask`] per player fetches status through a [`StatusSource`],
//! merges it into the shared registry and forwards the resulting change
//! events. Cadence follows activity (playing players poll fast, idle ones
//! slowly) and errors back off exponentially without ever abandoning the
//! player.

mod policy;
mod source;
mod task;

pub use policy::{
    PollPolicy, DEFAULT_BACKOFF_CAP, DEFAULT_BASE_INTERVAL, DEFAULT_IDLE_INTERVAL,
};
pub use source::StatusSource;
pub use task::{PollerTask, DEFAULT_SHUTDOWN_GRACE};
