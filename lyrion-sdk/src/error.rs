use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    Api(#[from] lyrion_api::ApiError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("server address is not configured")]
    NotConfigured,

    #[error("player not found: {0}")]
    PlayerNotFound(String),
}
