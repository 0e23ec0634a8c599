//! Delivery error types.

use thiserror::Error;

/// Delivery error type.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The send was cancelled before the sink answered.
    #[error("delivery cancelled")]
    Cancelled,

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DeliveryError {
    /// Check if the failure was a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeliveryError::Cancelled)
    }

    /// Check if the sink could not be reached at all.
    pub fn is_connect(&self) -> bool {
        matches!(self, DeliveryError::Http(e) if e.is_connect())
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, DeliveryError>;
