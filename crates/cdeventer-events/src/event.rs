//! The CDEvent document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::event_type::CdEventType;

/// Version of the CDEvents specification the registry implements.
pub const CDEVENTS_SPEC_VERSION: &str = "0.1.0";

/// Content type assumed for custom data when none is declared.
pub const DEFAULT_CUSTOM_DATA_CONTENT_TYPE: &str = "application/json";

/// A CDEvent: context, subject and optional custom data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CdEvent {
    pub context: Context,
    pub subject: Subject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_data_content_type: Option<String>,
}

/// Event context attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub version: String,
    pub id: String,
    pub source: String,
    #[serde(rename = "type")]
    pub event_type: CdEventType,
    pub timestamp: DateTime<Utc>,
}

/// The entity the event is about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    #[serde(rename = "type")]
    pub subject_type: String,
    #[serde(default)]
    pub content: SubjectContent,
}

/// Variant-specific subject attributes.
///
/// Which fields may be set for a variant is governed by
/// [`SUBJECT_FIELDS`](crate::subject::SUBJECT_FIELDS).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_run: Option<Reference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Reference>,
}

/// Reference to another subject.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
}

impl Reference {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: String::new(),
        }
    }
}

impl CdEvent {
    /// Create an event of the given variant with a fresh id and timestamp.
    ///
    /// The source is set on both the context and the subject. The subject id
    /// starts empty.
    pub fn new(event_type: CdEventType, source: impl Into<String>) -> Self {
        let source = source.into();
        Self {
            context: Context {
                version: CDEVENTS_SPEC_VERSION.to_string(),
                id: Uuid::new_v4().to_string(),
                source: source.clone(),
                event_type,
                timestamp: Utc::now(),
            },
            subject: Subject {
                id: String::new(),
                source,
                subject_type: event_type.subject_type().to_string(),
                content: SubjectContent::default(),
            },
            custom_data: None,
            custom_data_content_type: None,
        }
    }

    pub fn event_type(&self) -> CdEventType {
        self.context.event_type
    }

    pub fn id(&self) -> &str {
        &self.context.id
    }

    pub fn source(&self) -> &str {
        &self.context.source
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        let source = source.into();
        self.subject.source = source.clone();
        self.context.source = source;
    }

    pub fn set_subject_id(&mut self, id: impl Into<String>) {
        self.subject.id = id.into();
    }

    /// Attach custom data with its content type.
    pub fn set_custom_data(&mut self, content_type: impl Into<String>, data: serde_json::Value) {
        self.custom_data_content_type = Some(content_type.into());
        self.custom_data = Some(data);
    }

    /// Render the event as a compact JSON string.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse an event from its JSON rendering.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
