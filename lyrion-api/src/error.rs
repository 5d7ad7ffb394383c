use rpc_client::RpcError;
use thiserror::Error;

/// High-level API errors for LMS operations
///
/// Wraps the transport-level error taxonomy and adds the validation errors
/// the command encoder raises before any network call is made.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (timeout, refused, malformed, server fault)
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// A command argument was rejected before encoding
    ///
    /// Raised synchronously by the command encoder; no network call is
    /// issued for an invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A response was structurally valid JSON but not the shape expected
    /// for the command that produced it
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponse(String),
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
