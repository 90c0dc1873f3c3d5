//! Error types for the fridge simulator service

/// Errors that can occur in the fridge simulator service
#[derive(Debug, thiserror::Error)]
pub enum FridgeSimError {
    #[error("Invalid simulator configuration: {0}")]
    InvalidConfig(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for fridge simulator operations
pub type Result<T> = std::result::Result<T, FridgeSimError>;
