//! Replog Error Types

use thiserror::Error;

/// Result type alias for replog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Replog error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Replication errors
    #[error("Replication error: {0}")]
    Replication(String),

    #[error("Quorum not reached in time: {reached}/{required}")]
    QuorumTimeout { reached: usize, required: usize },

    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::QuorumTimeout { .. } | Error::Transport(_) | Error::Http(_)
        )
    }
}
