//! CloudEvent envelope and its HTTP rendering.
//!
//! [`CdEvent::as_cloud_event`] maps the CDEvent context onto the CloudEvents
//! v1.0 required attributes:
//! - `id`, `source` and `type` come from the CDEvent context
//! - `time` is the CDEvent timestamp
//! - `datacontenttype` is the custom data content type, or `application/json`
//! - `data` is the full CDEvent JSON document
//!
//! [`CloudEvent::to_http`] lays the envelope out for the HTTP protocol binding
//! in either [`ContentMode::Binary`] or [`ContentMode::Structured`]. In binary
//! mode every `ce-*` value is percent-encoded: space, `"`, `%` and anything
//! outside printable ASCII are written as `%XX` over their UTF-8 bytes.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use cdeventer_types::ContentMode;

use crate::error::{EventError, Result};
use crate::event::{CdEvent, DEFAULT_CUSTOM_DATA_CONTENT_TYPE};

/// CloudEvents specification version emitted by the encoder.
pub const CLOUDEVENTS_SPEC_VERSION: &str = "1.0";

const STRUCTURED_CONTENT_TYPE: &str = "application/cloudevents+json; charset=utf-8";

/// Bytes escaped in `ce-*` header values. Non-ASCII is always escaped.
const HEADER_VALUE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'%');

fn encode_header(value: &str) -> String {
    utf8_percent_encode(value, HEADER_VALUE).to_string()
}

fn decode_header(name: &str, value: &str) -> Result<String> {
    percent_decode_str(value)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|e| EventError::InvalidFormat(format!("{name} is not valid UTF-8: {e}")))
}

/// Header values that are not percent-encoded must still be legal on the wire.
fn check_plain_header(name: &str, value: &str) -> Result<()> {
    if value.bytes().all(|b| b == b'\t' || (b' '..=b'~').contains(&b)) {
        Ok(())
    } else {
        Err(EventError::InvalidFormat(format!(
            "{name} {value:?} contains characters not allowed in an HTTP header"
        )))
    }
}

/// A CloudEvents v1.0 envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudEvent {
    pub specversion: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<String>,
    pub data: serde_json::Value,
}

/// A CloudEvent laid out as an HTTP request: headers plus body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpMessage {
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl HttpMessage {
    /// Value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl CdEvent {
    /// Check the invariants a renderable event must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.context.id.is_empty() {
            return Err(EventError::InvalidFormat("context.id is empty".to_string()));
        }
        if self.context.source.is_empty() {
            return Err(EventError::InvalidFormat(
                "context.source is empty".to_string(),
            ));
        }
        if self.subject.id.is_empty() {
            return Err(EventError::InvalidFormat("subject.id is empty".to_string()));
        }
        if self.custom_data.is_some() != self.custom_data_content_type.is_some() {
            return Err(EventError::InvalidFormat(
                "customData and customDataContentType must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the event as a CloudEvent.
    pub fn as_cloud_event(&self) -> Result<CloudEvent> {
        self.validate()?;
        let data = serde_json::to_value(self)?;
        let datacontenttype = self
            .custom_data_content_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CUSTOM_DATA_CONTENT_TYPE.to_string());

        Ok(CloudEvent {
            specversion: CLOUDEVENTS_SPEC_VERSION.to_string(),
            id: self.context.id.clone(),
            source: self.context.source.clone(),
            event_type: self.context.event_type.as_str().to_string(),
            time: Some(self.context.timestamp),
            datacontenttype: Some(datacontenttype),
            data,
        })
    }
}

impl CloudEvent {
    /// The data content type, defaulting to JSON.
    pub fn content_type(&self) -> &str {
        self.datacontenttype
            .as_deref()
            .unwrap_or(DEFAULT_CUSTOM_DATA_CONTENT_TYPE)
    }

    /// Render for the HTTP protocol binding.
    ///
    /// Fails with [`EventError::InvalidFormat`] when the content type cannot
    /// be carried as a header value.
    pub fn to_http(&self, mode: ContentMode) -> Result<HttpMessage> {
        match mode {
            ContentMode::Binary => {
                let content_type = self.content_type();
                check_plain_header("content-type", content_type)?;

                let mut headers = vec![
                    ("ce-specversion", encode_header(&self.specversion)),
                    ("ce-id", encode_header(&self.id)),
                    ("ce-source", encode_header(&self.source)),
                    ("ce-type", encode_header(&self.event_type)),
                ];
                if let Some(time) = self.time {
                    let time = time.to_rfc3339_opts(SecondsFormat::AutoSi, true);
                    headers.push(("ce-time", encode_header(&time)));
                }
                headers.push(("content-type", content_type.to_string()));
                Ok(HttpMessage {
                    headers,
                    body: serde_json::to_vec(&self.data)?,
                })
            }
            ContentMode::Structured => Ok(HttpMessage {
                headers: vec![("content-type", STRUCTURED_CONTENT_TYPE.to_string())],
                body: serde_json::to_vec(self)?,
            }),
        }
    }

    /// Read a CloudEvent back from an HTTP message in either content mode.
    pub fn from_http(message: &HttpMessage) -> Result<CloudEvent> {
        let content_type = message.header("content-type");
        if content_type.is_some_and(|ct| ct.starts_with("application/cloudevents+json")) {
            return Ok(serde_json::from_slice(&message.body)?);
        }

        let required = |name: &str| -> Result<String> {
            let value = message
                .header(name)
                .ok_or_else(|| EventError::InvalidFormat(format!("missing {name} header")))?;
            decode_header(name, value)
        };
        let time = match message.header("ce-time") {
            Some(value) => {
                let value = decode_header("ce-time", value)?;
                let time = DateTime::parse_from_rfc3339(&value)
                    .map_err(|e| EventError::InvalidFormat(format!("ce-time: {e}")))?;
                Some(time.with_timezone(&Utc))
            }
            None => None,
        };

        Ok(CloudEvent {
            specversion: required("ce-specversion")?,
            id: required("ce-id")?,
            source: required("ce-source")?,
            event_type: required("ce-type")?,
            time,
            datacontenttype: content_type.map(str::to_string),
            data: serde_json::from_slice(&message.body)?,
        })
    }

    /// Decode the CDEvent carried in `data`.
    pub fn to_cd_event(&self) -> Result<CdEvent> {
        Ok(serde_json::from_value(self.data.clone())?)
    }
}
