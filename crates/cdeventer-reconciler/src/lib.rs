//! Run-to-CDEvent reconciliation engine.
//!
//! A [`Reconciler`] takes a [`Run`](cdeventer_types::Run) whose reference
//! points at the `custom.tekton.dev/v0` `CDEvent` custom task, builds the
//! CDEvent described by its parameters, and delivers it once as a CloudEvent.
//!
//! # Pipeline
//!
//! ```text
//! Run.spec.params
//!   └─► ParsedRequest::from_params      (context / subject / data maps)
//!        └─► factory::build_event        (variant, source, subject fields)
//!             └─► custom_data::attach    (optional JSON payload)
//!                  └─► CdEvent::as_cloud_event
//!                       └─► Sink::send   (one attempt)
//!                            └─► Run status: Succeeded("Sent") | Failed(reason)
//! ```
//!
//! Every step returns a [`ReconcileError`]; the first failure stops the
//! pipeline, is recorded on the Run status, and is returned to the caller.

pub mod controller;
pub mod custom_data;
pub mod error;
pub mod factory;
pub mod params;
pub mod reconciler;

pub use controller::{CONTROLLER_NAME, filter_run_ref, is_cdevent_run, reconcile_all};
pub use error::{ReconcileError, Result};
pub use factory::build_event;
pub use params::ParsedRequest;
pub use reconciler::{Reconciler, ReconcilerBuilder, SENT_MESSAGE, SENT_REASON, encode_run};
