//! CDEvent model and CloudEvent encoding for cdeventer.
//!
//! # Architecture
//!
//! ```text
//! CdEventType ──► CdEvent::new ──► set_subject_field (matrix) ──► set_custom_data
//!                                                                      │
//!                              HttpMessage ◄── CloudEvent ◄── as_cloud_event
//! ```
//!
//! - [`CdEventType`] is the closed registry of supported event variants.
//! - [`subject::SUBJECT_FIELDS`] is the static table of subject fields and the
//!   variants each field is legal for.
//! - [`CloudEvent`] is the transport envelope, rendered into an
//!   [`HttpMessage`] in binary or structured content mode.

pub mod cloudevent;
pub mod error;
pub mod event;
pub mod event_type;
pub mod subject;

pub use cloudevent::{CLOUDEVENTS_SPEC_VERSION, CloudEvent, HttpMessage};
pub use error::{EventError, Result};
pub use event::{
    CDEVENTS_SPEC_VERSION, CdEvent, Context, DEFAULT_CUSTOM_DATA_CONTENT_TYPE, Reference, Subject,
    SubjectContent,
};
pub use event_type::CdEventType;
pub use subject::{FieldRule, SUBJECT_FIELDS, field_rule, is_legal};
