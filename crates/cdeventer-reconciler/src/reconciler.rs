//! The reconciliation state machine.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use cdeventer_client::{DeliveryOutcome, SharedSink};
use cdeventer_events::HttpMessage;
use cdeventer_types::{CDEVENT_API_VERSION, CDEVENT_KIND, ContentMode, Run};

use crate::error::{ReconcileError, Result};
use crate::factory::build_event;
use crate::params::ParsedRequest;

/// Status reason written when the event was delivered.
pub const SENT_REASON: &str = "Sent";
/// Status message written when the event was delivered.
pub const SENT_MESSAGE: &str = "CDEvent successfully sent";

/// Turns CDEvent Runs into delivered CloudEvents.
///
/// Holds no per-attempt state, so one instance can reconcile many Runs
/// concurrently.
#[derive(Clone)]
pub struct Reconciler {
    sink: Option<SharedSink>,
    target: Url,
    mode: ContentMode,
}

impl Reconciler {
    /// Start building a reconciler that delivers to `target`.
    pub fn builder(target: Url) -> ReconcilerBuilder {
        ReconcilerBuilder::new(target)
    }

    /// Sink URL events are delivered to.
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// CloudEvents content mode used for delivery.
    pub fn content_mode(&self) -> ContentMode {
        self.mode
    }

    /// Reconcile a Run once without external cancellation.
    pub async fn reconcile(&self, run: &mut Run) -> Result<()> {
        self.reconcile_with_cancel(run, &CancellationToken::new())
            .await
    }

    /// Reconcile a Run once.
    ///
    /// Finished Runs and Runs referencing another custom task are left
    /// untouched. Otherwise the status is written exactly once: `Succeeded`
    /// after delivery, `Failed` with the error's reason on the first failure.
    /// The error is returned as well so the caller can requeue.
    pub async fn reconcile_with_cancel(
        &self,
        run: &mut Run,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let key = run.key();
        info!(run = %key, "reconciling Run");

        if run.is_done() {
            debug!(run = %key, "Run is finished, done reconciling");
            return Ok(());
        }

        let result = match run.spec.run_ref.as_ref() {
            Some(run_ref) if run_ref.matches(CDEVENT_API_VERSION, CDEVENT_KIND) => {
                if run_ref.name.is_empty() {
                    self.send_run(run, cancel).await
                } else {
                    Err(ReconcileError::UnexpectedName(run_ref.name.clone()))
                }
            }
            _ => {
                debug!(run = %key, "Run does not reference a CDEvent custom task, skipping");
                return Ok(());
            }
        };

        match result {
            Ok(()) => {
                info!(run = %key, "CDEvent sent");
                run.mark_succeeded(SENT_REASON, SENT_MESSAGE);
                Ok(())
            }
            Err(e) => {
                warn!(run = %key, reason = e.reason(), error = %e, "reconcile failed");
                run.mark_failed(e.reason(), e.status_message());
                Err(e)
            }
        }
    }

    async fn send_run(&self, run: &Run, cancel: &CancellationToken) -> Result<()> {
        let message = encode_run(run, self.mode)?;
        let sink = self.sink.as_ref().ok_or(ReconcileError::NoClient)?;

        match sink.send(&self.target, &message, cancel).await {
            DeliveryOutcome::Delivered { status } => {
                debug!(run = %run.key(), status, "CloudEvent delivered");
                Ok(())
            }
            DeliveryOutcome::Undelivered(cause) => Err(ReconcileError::Send(cause)),
        }
    }
}

/// Parse, build and render the CDEvent a Run describes, without delivering it.
///
/// The returned message is exactly what a sink receives in `mode`.
pub fn encode_run(run: &Run, mode: ContentMode) -> Result<HttpMessage> {
    let request = ParsedRequest::from_params(&run.spec.params)?;
    let event = build_event(&request)?;
    match event.to_json_string() {
        Ok(json) => info!(run = %run.key(), cdevent = %json, "built CDEvent"),
        Err(e) => warn!(run = %run.key(), error = %e, "could not log CDEvent"),
    }
    event
        .as_cloud_event()
        .and_then(|cloud_event| cloud_event.to_http(mode))
        .map_err(ReconcileError::InvalidFormat)
}

/// Builder for a [`Reconciler`].
pub struct ReconcilerBuilder {
    sink: Option<SharedSink>,
    target: Url,
    mode: ContentMode,
}

impl ReconcilerBuilder {
    pub fn new(target: Url) -> Self {
        Self {
            sink: None,
            target,
            mode: ContentMode::default(),
        }
    }

    /// Set the delivery client. Without one every attempt fails `NoClient`.
    pub fn sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Set the CloudEvents content mode (binary by default).
    pub fn content_mode(mut self, mode: ContentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn build(self) -> Reconciler {
        Reconciler {
            sink: self.sink,
            target: self.target,
            mode: self.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cdeventer_events::CloudEvent;
    use cdeventer_types::{ConditionStatus, Param};

    fn target() -> Url {
        Url::parse("http://localhost:1/").unwrap()
    }

    fn queued_run() -> Run {
        Run::new("default", "queued")
            .with_param(Param::object(
                "context",
                [
                    ("type", "dev.cdevents.pipelinerun.queued.0.1.0"),
                    ("source", "test"),
                ],
            ))
            .with_param(Param::object("subject", [("id", "pr1")]))
    }

    #[test]
    fn test_builder_defaults() {
        let reconciler = Reconciler::builder(target()).build();
        assert_eq!(reconciler.content_mode(), ContentMode::Binary);
        assert_eq!(reconciler.target().as_str(), "http://localhost:1/");
    }

    fn with_context(mut run: Run, source: &str) -> Run {
        run.spec.params[0] = Param::object(
            "context",
            [
                ("type", "dev.cdevents.pipelinerun.queued.0.1.0"),
                ("source", source),
            ],
        );
        run
    }

    #[test]
    fn test_encode_run() {
        let message = encode_run(&queued_run(), ContentMode::Binary).unwrap();
        assert_eq!(
            message.header("ce-type"),
            Some("dev.cdevents.pipelinerun.queued.0.1.0")
        );
        assert_eq!(message.header("ce-source"), Some("test"));

        let structured = encode_run(&queued_run(), ContentMode::Structured).unwrap();
        let cloud_event = CloudEvent::from_http(&structured).unwrap();
        assert_eq!(cloud_event.source, "test");
    }

    #[test]
    fn test_encode_run_escapes_source() {
        let run = with_context(queued_run(), "ci/café 100%");
        let message = encode_run(&run, ContentMode::Binary).unwrap();
        assert_eq!(message.header("ce-source"), Some("ci/caf%C3%A9%20100%25"));
        assert_eq!(
            CloudEvent::from_http(&message).unwrap().source,
            "ci/café 100%"
        );
    }

    #[test]
    fn test_encode_run_requires_subject_id() {
        let mut run = queued_run();
        run.spec.params.pop();
        let err = encode_run(&run, ContentMode::Binary).unwrap_err();
        assert_eq!(err.reason(), "InvalidFormat");
    }

    #[tokio::test]
    async fn test_unrenderable_content_type_fails_before_client_check() {
        let reconciler = Reconciler::builder(target()).build();
        let mut run = queued_run().with_param(Param::object(
            "data",
            [
                ("customData", r#""hello""#),
                ("customDataContentType", "text/plain\nx-injected: 1"),
            ],
        ));

        let err = reconciler.reconcile(&mut run).await.unwrap_err();
        assert!(matches!(err, ReconcileError::InvalidFormat(_)));
        assert_eq!(run.succeeded_condition().unwrap().reason, "InvalidFormat");
    }

    #[tokio::test]
    async fn test_no_client() {
        let reconciler = Reconciler::builder(target()).build();
        let mut run = queued_run();

        let err = reconciler.reconcile(&mut run).await.unwrap_err();
        assert!(matches!(err, ReconcileError::NoClient));

        let condition = run.succeeded_condition().unwrap();
        assert_eq!(condition.status, ConditionStatus::False);
        assert_eq!(condition.reason, "NoClient");
    }

    #[tokio::test]
    async fn test_validation_runs_before_client_check() {
        let reconciler = Reconciler::builder(target()).build();
        let mut run = queued_run();
        run.spec.params.push(Param::string("data", "{}"));

        let err = reconciler.reconcile(&mut run).await.unwrap_err();
        assert_eq!(err.reason(), "UnexpectedParamType");
    }
}
