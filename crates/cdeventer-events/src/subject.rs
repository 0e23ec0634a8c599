//! Subject field dispatch.
//!
//! Each row of [`SUBJECT_FIELDS`] names a subject field, the setter that
//! writes it and the variants it is legal for. A field that has no row, or
//! whose row does not list the event's variant, is rejected.

use crate::error::{EventError, Result};
use crate::event::{CdEvent, Reference, Subject};
use crate::event_type::CdEventType::{self, *};

type Setter = fn(&mut Subject, &str);

/// One row of the field/variant compatibility matrix.
pub struct FieldRule {
    /// Key as it appears in the `subject` parameter.
    pub field: &'static str,
    /// Variants the field may be set on.
    pub variants: &'static [CdEventType],
    setter: Setter,
}

impl FieldRule {
    pub fn allows(&self, event_type: CdEventType) -> bool {
        self.variants.contains(&event_type)
    }
}

const PIPELINE_RUNS: &[CdEventType] = &[PipelineRunQueued, PipelineRunStarted, PipelineRunFinished];
const TASK_RUNS: &[CdEventType] = &[TaskRunStarted, TaskRunFinished];
const FINISHED_RUNS: &[CdEventType] = &[TaskRunFinished, PipelineRunFinished];
const REPOSITORIES: &[CdEventType] = &[RepositoryCreated, RepositoryModified, RepositoryDeleted];
const URL_VARIANTS: &[CdEventType] = &[
    PipelineRunQueued,
    PipelineRunStarted,
    PipelineRunFinished,
    TaskRunStarted,
    TaskRunFinished,
    RepositoryCreated,
    RepositoryModified,
    RepositoryDeleted,
    EnvironmentCreated,
    EnvironmentModified,
];
const NAMED: &[CdEventType] = &[
    RepositoryCreated,
    RepositoryModified,
    RepositoryDeleted,
    EnvironmentCreated,
    EnvironmentModified,
    EnvironmentDeleted,
];
const SERVICES: &[CdEventType] = &[
    ServiceDeployed,
    ServicePublished,
    ServiceRemoved,
    ServiceRolledback,
    ServiceUpgraded,
];

/// The field/variant compatibility matrix.
pub static SUBJECT_FIELDS: &[FieldRule] = &[
    FieldRule {
        field: "id",
        variants: CdEventType::ALL,
        setter: set_id,
    },
    FieldRule {
        field: "pipelineName",
        variants: PIPELINE_RUNS,
        setter: set_pipeline_name,
    },
    FieldRule {
        field: "taskName",
        variants: TASK_RUNS,
        setter: set_task_name,
    },
    FieldRule {
        field: "pipelineRun",
        variants: TASK_RUNS,
        setter: set_pipeline_run,
    },
    FieldRule {
        field: "outcome",
        variants: FINISHED_RUNS,
        setter: set_outcome,
    },
    FieldRule {
        field: "url",
        variants: URL_VARIANTS,
        setter: set_url,
    },
    FieldRule {
        field: "errors",
        variants: FINISHED_RUNS,
        setter: set_errors,
    },
    FieldRule {
        field: "name",
        variants: NAMED,
        setter: set_name,
    },
    FieldRule {
        field: "owner",
        variants: REPOSITORIES,
        setter: set_owner,
    },
    FieldRule {
        field: "viewUrl",
        variants: REPOSITORIES,
        setter: set_view_url,
    },
    FieldRule {
        field: "artifactId",
        variants: &[BuildFinished],
        setter: set_artifact_id,
    },
    FieldRule {
        field: "environmentId",
        variants: SERVICES,
        setter: set_environment_id,
    },
];

fn set_id(s: &mut Subject, v: &str) {
    s.id = v.to_string();
}

fn set_pipeline_name(s: &mut Subject, v: &str) {
    s.content.pipeline_name = Some(v.to_string());
}

fn set_task_name(s: &mut Subject, v: &str) {
    s.content.task_name = Some(v.to_string());
}

fn set_pipeline_run(s: &mut Subject, v: &str) {
    s.content.pipeline_run = Some(Reference::new(v));
}

fn set_outcome(s: &mut Subject, v: &str) {
    s.content.outcome = Some(v.to_string());
}

fn set_url(s: &mut Subject, v: &str) {
    s.content.url = Some(v.to_string());
}

fn set_errors(s: &mut Subject, v: &str) {
    s.content.errors = Some(v.to_string());
}

fn set_name(s: &mut Subject, v: &str) {
    s.content.name = Some(v.to_string());
}

fn set_owner(s: &mut Subject, v: &str) {
    s.content.owner = Some(v.to_string());
}

fn set_view_url(s: &mut Subject, v: &str) {
    s.content.view_url = Some(v.to_string());
}

fn set_artifact_id(s: &mut Subject, v: &str) {
    s.content.artifact_id = Some(v.to_string());
}

fn set_environment_id(s: &mut Subject, v: &str) {
    s.content.environment = Some(Reference::new(v));
}

/// Look up the matrix row for a subject field.
pub fn field_rule(field: &str) -> Option<&'static FieldRule> {
    SUBJECT_FIELDS.iter().find(|rule| rule.field == field)
}

/// Whether `field` may be set on events of `event_type`.
pub fn is_legal(field: &str, event_type: CdEventType) -> bool {
    field_rule(field).is_some_and(|rule| rule.allows(event_type))
}

impl CdEvent {
    /// Set one subject field, enforcing the compatibility matrix.
    pub fn set_subject_field(&mut self, field: &str, value: &str) -> Result<()> {
        let event_type = self.event_type();
        match field_rule(field) {
            Some(rule) if rule.allows(event_type) => {
                (rule.setter)(&mut self.subject, value);
                Ok(())
            }
            _ => Err(EventError::UnexpectedSubjectField {
                field: field.to_string(),
                event_type,
            }),
        }
    }

    /// Set every field of a subject map, stopping at the first rejected field.
    pub fn set_subject_fields<'a, I>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        for (field, value) in fields {
            self.set_subject_field(field, value)?;
        }
        Ok(())
    }
}
