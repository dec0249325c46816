//! Error types for ledger-core

use thiserror::Error;

/// Result type alias using ledger-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in ledger-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Websocket transport error
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend API responded with an error
    #[error("Backend API error: {0}")]
    Api(String),

    /// Object storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Live feed error
    #[error("Realtime error: {0}")]
    Realtime(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}
