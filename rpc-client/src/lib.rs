//! Private JSON-RPC client for Lyrion Music Server communication
//!
//! This crate provides a minimal JSON-RPC client specifically designed for
//! talking to a single LMS endpoint. Every call is an independent POST to
//! `/jsonrpc.js` carrying a positional command vector; the client owns
//! connection reuse, a bounded timeout, and response parsing. Retry policy
//! deliberately belongs to callers: a blind retry of a stateful playback
//! command (e.g. "next track") could double-apply.

mod error;

pub use error::RpcError;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

/// Default per-request timeout. This is a local-network interactive control
/// path, so anything longer just delays the backoff logic upstream.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(4);

/// A minimal JSON-RPC client bound to one LMS endpoint
#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    jsonrpc_url: String,
    base_url: String,
    timeout: Duration,
    request_id: AtomicU64,
}

impl RpcClient {
    /// Create a new client for the given server address
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_timeout(host, port, DEFAULT_TIMEOUT)
    }

    /// Create a new client with a custom request timeout
    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        let base_url = format!("http://{}:{}", host, port);
        Self {
            http: reqwest::Client::new(),
            jsonrpc_url: format!("{}/jsonrpc.js", base_url),
            base_url,
            timeout,
            request_id: AtomicU64::new(0),
        }
    }

    /// The server base URL (`http://host:port`), used for artwork references
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Issue a single JSON-RPC call and return the `result` object.
    ///
    /// `player_id` is `None` for server-global methods (version, favorites
    /// listing, player discovery); the wire format uses an empty string for
    /// those. The command vector is sent verbatim as positional tokens.
    pub async fn call(
        &self,
        player_id: Option<&str>,
        command: &[&str],
    ) -> Result<Value, RpcError> {
        let payload = json!({
            "id": self.next_request_id(),
            "method": "slim.request",
            "params": [player_id.unwrap_or(""), command],
        });

        debug!(player = player_id.unwrap_or("<server>"), ?command, "rpc call");

        let response = self
            .http
            .post(&self.jsonrpc_url)
            .timeout(self.timeout)
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "rpc call rejected");
            return Err(RpcError::Http(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| RpcError::MalformedResponse(e.to_string()))?;

        if let Some(error) = body.get("error") {
            let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
            return Err(RpcError::ServerFault(code));
        }

        match body.get("result") {
            Some(result) => Ok(result.clone()),
            None => Err(RpcError::MalformedResponse(
                "response has no result field".to_string(),
            )),
        }
    }
}

fn map_reqwest_error(e: reqwest::Error) -> RpcError {
    if e.is_timeout() {
        RpcError::Timeout
    } else if e.is_connect() {
        RpcError::ConnectionRefused(e.to_string())
    } else {
        RpcError::MalformedResponse(e.to_string())
    }
}
