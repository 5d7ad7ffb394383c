//! Error types for the JSON-RPC client

use thiserror::Error;

/// Errors that can occur during JSON-RPC communication
#[derive(Debug, Error)]
pub enum RpcError {
    /// The request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// The server refused the connection or was unreachable
    #[error("Connection refused: {0}")]
    ConnectionRefused(String),

    /// The server answered with a non-success HTTP status
    #[error("HTTP error: status {0}")]
    Http(u16),

    /// The response body could not be parsed as a JSON-RPC result
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The server returned a JSON-RPC error object
    #[error("Server fault: error code {0}")]
    ServerFault(i64),
}

impl RpcError {
    /// Whether the error is a transient network condition worth retrying
    /// later (as opposed to a malformed request or a server-side fault).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            RpcError::Timeout | RpcError::ConnectionRefused(_) | RpcError::Http(_)
        )
    }
}
