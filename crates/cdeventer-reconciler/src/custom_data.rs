//! Custom data attachment.

use cdeventer_events::{CdEvent, DEFAULT_CUSTOM_DATA_CONTENT_TYPE};

use crate::error::{ReconcileError, Result};
use crate::params::{DATA_PARAM, ParamMap};

/// Key holding the JSON-encoded payload.
pub const CUSTOM_DATA_KEY: &str = "customData";
/// Key holding the payload content type.
pub const CUSTOM_DATA_CONTENT_TYPE_KEY: &str = "customDataContentType";

/// Decode the `data` parameter and attach it to the event.
///
/// An absent map leaves the event untouched.
pub fn attach(event: &mut CdEvent, data: Option<&ParamMap>) -> Result<()> {
    let Some(data) = data else {
        return Ok(());
    };

    let raw = data
        .get(CUSTOM_DATA_KEY)
        .ok_or_else(|| ReconcileError::missing(DATA_PARAM, CUSTOM_DATA_KEY))?;
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(ReconcileError::InvalidCustomData)?;
    let content_type = data
        .get(CUSTOM_DATA_CONTENT_TYPE_KEY)
        .map(String::as_str)
        .unwrap_or(DEFAULT_CUSTOM_DATA_CONTENT_TYPE);

    event.set_custom_data(content_type, value);
    Ok(())
}
