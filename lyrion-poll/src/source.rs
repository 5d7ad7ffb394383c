//! Status source abstraction
//!
//! The poller loop only needs "fetch the current status of one player".
//! Putting that behind a trait keeps the loop testable with scripted
//! sources and keeps the transport crate out of this one's direct callers.

use async_trait::async_trait;

use lyrion_api::{ApiError, StatusReport};
use lyrion_state::PlayerId;

/// Anything that can produce a status report for a player
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the current status of one player
    async fn fetch_status(&self, player_id: &PlayerId) -> Result<StatusReport, ApiError>;
}
