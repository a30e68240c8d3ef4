use thiserror::Error;

#[derive(Debug, Error)]
pub enum MqError {
    #[error("Broker error: {0}")]
    Broker(#[from] lapin::Error),

    #[error("No channels available in the pool")]
    NoChannels,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}
