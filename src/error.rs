//! Error types for the Wit client.

use thiserror::Error;

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum WitError {
    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, WitError>;
