//! CDEvent construction from parsed parameters.

use cdeventer_events::{CdEvent, CdEventType, EventError};

use crate::custom_data;
use crate::error::{ReconcileError, Result};
use crate::params::{CONTEXT_PARAM, ParamMap, ParsedRequest};

const TYPE_KEY: &str = "type";
const SOURCE_KEY: &str = "source";

/// Build the fully populated CDEvent for a request.
///
/// Runs the factory, the subject field dispatcher and the custom data
/// attacher in order; the first failure is returned.
pub fn build_event(request: &ParsedRequest) -> Result<CdEvent> {
    let mut event = new_event(request.context.as_ref())?;
    if let Some(subject) = &request.subject {
        apply_subject(&mut event, subject)?;
    }
    custom_data::attach(&mut event, request.data.as_ref())?;
    Ok(event)
}

/// Create the CDEvent variant named by the context `type`, with its `source`.
pub fn new_event(context: Option<&ParamMap>) -> Result<CdEvent> {
    let event_type = context
        .and_then(|c| c.get(TYPE_KEY))
        .ok_or_else(|| ReconcileError::missing(CONTEXT_PARAM, TYPE_KEY))?;
    let event_type: CdEventType = event_type.parse().map_err(ReconcileError::InvalidCdEvent)?;

    let source = context
        .and_then(|c| c.get(SOURCE_KEY))
        .ok_or_else(|| ReconcileError::missing(CONTEXT_PARAM, SOURCE_KEY))?;

    Ok(CdEvent::new(event_type, source.as_str()))
}

/// Apply every subject key to the event, enforcing the field matrix.
pub fn apply_subject(event: &mut CdEvent, subject: &ParamMap) -> Result<()> {
    event.set_subject_fields(subject).map_err(|e| match e {
        EventError::UnexpectedSubjectField { field, event_type } => {
            ReconcileError::UnexpectedSubjectField { field, event_type }
        }
        other => ReconcileError::InvalidCdEvent(other),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> ParamMap {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_new_event_sets_type_and_source() {
        let context = map(&[
            ("type", "dev.cdevents.pipelinerun.queued.0.1.0"),
            ("source", "test"),
        ]);
        let event = new_event(Some(&context)).unwrap();
        assert_eq!(event.event_type(), CdEventType::PipelineRunQueued);
        assert_eq!(event.source(), "test");
        assert_eq!(event.subject.source, "test");
        assert!(!event.id().is_empty());
    }

    #[test]
    fn test_fresh_id_per_event() {
        let context = map(&[("type", "dev.cdevents.build.finished.0.1.0"), ("source", "s")]);
        let a = new_event(Some(&context)).unwrap();
        let b = new_event(Some(&context)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_missing_context() {
        let err = new_event(None).unwrap_err();
        assert!(
            matches!(err, ReconcileError::MissingParam { ref param, ref field } if param == "context" && field == "type")
        );
    }

    #[test]
    fn test_missing_source() {
        let context = map(&[("type", "dev.cdevents.pipelinerun.queued.0.1.0")]);
        let err = new_event(Some(&context)).unwrap_err();
        assert!(matches!(err, ReconcileError::MissingParam { ref field, .. } if field == "source"));
    }

    #[test]
    fn test_unknown_type_checked_before_source() {
        let context = map(&[("type", "dev.cdevents.unknown.0.1.0")]);
        let err = new_event(Some(&context)).unwrap_err();
        assert_eq!(err.reason(), "InvalidCDEvent");
    }

    #[test]
    fn test_apply_subject() {
        let context = map(&[("type", "dev.cdevents.taskrun.finished.0.1.0"), ("source", "s")]);
        let mut event = new_event(Some(&context)).unwrap();
        apply_subject(
            &mut event,
            &map(&[
                ("id", "tr1"),
                ("taskName", "unit"),
                ("pipelineRun", "pr1"),
                ("outcome", "success"),
            ]),
        )
        .unwrap();
        assert_eq!(event.subject.id, "tr1");
        assert_eq!(event.subject.content.task_name.as_deref(), Some("unit"));
        assert_eq!(
            event.subject.content.pipeline_run.as_ref().map(|r| r.id.as_str()),
            Some("pr1")
        );
    }

    #[test]
    fn test_apply_subject_rejects_illegal_field() {
        let context = map(&[("type", "dev.cdevents.taskrun.started.0.1.0"), ("source", "s")]);
        let mut event = new_event(Some(&context)).unwrap();
        let err = apply_subject(&mut event, &map(&[("id", "tr1"), ("pipelineName", "build")]))
            .unwrap_err();
        match err {
            ReconcileError::UnexpectedSubjectField { field, event_type } => {
                assert_eq!(field, "pipelineName");
                assert_eq!(event_type, CdEventType::TaskRunStarted);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_build_event_without_subject() {
        let request = ParsedRequest {
            context: Some(map(&[("type", "dev.cdevents.service.deployed.0.1.0"), ("source", "s")])),
            ..Default::default()
        };
        let event = build_event(&request).unwrap();
        assert!(event.subject.id.is_empty());
        assert!(event.custom_data.is_none());
    }
}
