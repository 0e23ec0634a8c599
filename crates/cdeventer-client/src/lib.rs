//! CloudEvents delivery for cdeventer.
//!
//! The [`Sink`] trait is the seam between the reconciler and the network.
//! Events arrive already rendered as an [`HttpMessage`](cdeventer_events::HttpMessage).
//! [`HttpSink`] is the production implementation: one HTTP POST per event,
//! no connection reuse, no retries.
//!
//! # Example
//!
//! ```no_run
//! use cdeventer_client::{HttpSink, Sink};
//! use cdeventer_events::{CdEvent, CdEventType};
//! use cdeventer_types::ContentMode;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let sink = HttpSink::new()?;
//! let target = url::Url::parse("http://localhost:8080/events")?;
//!
//! let mut event = CdEvent::new(CdEventType::PipelineRunQueued, "example");
//! event.set_subject_id("pr1");
//! let message = event.as_cloud_event()?.to_http(ContentMode::Binary)?;
//!
//! let outcome = sink
//!     .send(&target, &message, &CancellationToken::new())
//!     .await;
//! println!("delivered: {}", outcome.is_delivered());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod sink;

pub use client::{HttpSink, HttpSinkBuilder};
pub use error::{DeliveryError, Result};
pub use sink::{DeliveryOutcome, SharedSink, Sink};
