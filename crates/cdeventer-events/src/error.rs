//! Error types for the CDEvent model.

use thiserror::Error;

use crate::event_type::CdEventType;

/// Result type for CDEvent operations.
pub type Result<T> = std::result::Result<T, EventError>;

/// Errors raised while building or encoding a CDEvent.
#[derive(Debug, Error)]
pub enum EventError {
    /// The type string is not in the variant registry.
    #[error("unknown CDEvent type \"{0}\"")]
    UnknownType(String),

    /// The subject field does not exist or is not legal for the event variant.
    #[error("subject field \"{field}\" is not valid for {event_type}")]
    UnexpectedSubjectField {
        field: String,
        event_type: CdEventType,
    },

    /// The event violates an invariant required for rendering.
    #[error("invalid CDEvent: {0}")]
    InvalidFormat(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
