//! Storage errors.

use thiserror::Error;

use tetraj_core::GatewayError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed leaderboard data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("{0} is not available")]
    Unavailable(String),
}

impl From<StoreError> for GatewayError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(_) => GatewayError::Unavailable,
            other => GatewayError::Storage(other.to_string()),
        }
    }
}
