//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("signer error: {0}")]
    Signer(String),

    #[error("publish rejected by all relays: {0}")]
    PublishRejected(String),

    #[error("invalid public key: {0}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Client result type.
pub type Result<T> = std::result::Result<T, ClientError>;
