//! Error types for reconciliation.

use thiserror::Error;

use cdeventer_client::DeliveryError;
use cdeventer_events::{CdEventType, EventError};
use cdeventer_types::ParamType;

/// Result type for reconciliation.
pub type Result<T> = std::result::Result<T, ReconcileError>;

/// Errors that end a reconciliation attempt.
///
/// Each variant maps to a stable status reason via [`ReconcileError::reason`].
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// A parameter is not object-typed.
    #[error("unexpected param type {param_type} for param {param}")]
    UnexpectedParamType { param: String, param_type: ParamType },

    /// A parameter name is not `context`, `subject` or `data`.
    #[error("unexpected param name {0}")]
    UnexpectedParamName(String),

    /// A subject key is unknown, or not legal for the event variant.
    #[error("unexpected param \"{field}\" in subject for {event_type}")]
    UnexpectedSubjectField {
        field: String,
        event_type: CdEventType,
    },

    /// A required key is missing from a parameter.
    #[error("missing \"{field}\" in the {param} param")]
    MissingParam { param: String, field: String },

    /// The event type is not a known CDEvent.
    #[error("could not create CDEvent: {0}")]
    InvalidCdEvent(#[source] EventError),

    /// `customData` is not valid JSON.
    #[error("could not unmarshal custom data: {0}")]
    InvalidCustomData(#[source] serde_json::Error),

    /// The CDEvent could not be rendered as a CloudEvent.
    #[error("could not render as CloudEvent: {0}")]
    InvalidFormat(#[source] EventError),

    /// No delivery client is configured.
    #[error("no cloud events client found in the reconciler")]
    NoClient,

    /// The CloudEvent was not delivered.
    #[error("could not send the CloudEvent: {0}")]
    Send(#[source] DeliveryError),

    /// The custom task reference carries a name.
    #[error("unexpected ref name: {0}")]
    UnexpectedName(String),
}

impl ReconcileError {
    /// Stable reason code written to the Run status.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnexpectedParamType { .. } => "UnexpectedParamType",
            Self::UnexpectedParamName(_) | Self::UnexpectedSubjectField { .. } => "UnexpectedParam",
            Self::MissingParam { .. } => "MissingParam",
            Self::InvalidCdEvent(_) => "InvalidCDEvent",
            Self::InvalidCustomData(_) => "InvalidCustomData",
            Self::InvalidFormat(_) => "InvalidFormat",
            Self::NoClient => "NoClient",
            Self::Send(_) => "SendError",
            Self::UnexpectedName(_) => "UnexpectedName",
        }
    }

    /// Human-readable message written to the Run status.
    pub fn status_message(&self) -> String {
        match self {
            Self::UnexpectedParamType { param, param_type } => {
                format!("Unexpected param type {param_type} for param {param}")
            }
            Self::UnexpectedParamName(name) => format!("Unexpected param name {name}"),
            Self::UnexpectedSubjectField { field, event_type } => {
                format!("Unexpected param \"{field}\" in subject for {event_type}")
            }
            Self::MissingParam { param, field } => {
                format!("Missing \"{field}\" in the {param} param")
            }
            Self::InvalidCdEvent(e) => format!("Could not create CDEvent: {e}"),
            Self::InvalidCustomData(e) => format!("Could not unmarshal custom data: {e}"),
            Self::InvalidFormat(e) => format!("Could not render as CloudEvent: {e}"),
            Self::NoClient => "No cloud events client found in the reconciler".to_string(),
            Self::Send(e) => format!("Could not send the CloudEvent: {e}"),
            Self::UnexpectedName(name) => format!("Found unexpected ref name: {name}"),
        }
    }

    pub(crate) fn missing(param: &str, field: &str) -> Self {
        Self::MissingParam {
            param: param.to_string(),
            field: field.to_string(),
        }
    }
}
