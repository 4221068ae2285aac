//! Error types for the opsdeck engine

/// Errors that can occur in the opsdeck engine
#[derive(Debug, thiserror::Error)]
pub enum OpsdeckError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for opsdeck operations
pub type Result<T> = std::result::Result<T, OpsdeckError>;
