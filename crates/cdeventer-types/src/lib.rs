//! Shared types for the cdeventer controller.
//!
//! The [`Run`] resource is the work request the controller reconciles. Its
//! serialized shape follows the Tekton `v1alpha1` Run manifest so that the
//! same YAML/JSON a cluster would hold can be loaded directly.

pub mod content_mode;
pub mod run;

pub use content_mode::{ContentMode, ParseContentModeError};
pub use run::{
    CDEVENT_API_VERSION, CDEVENT_KIND, Condition, ConditionStatus, ObjectMeta, Param, ParamType,
    ParamValue, Run, RunRef, RunSpec, RunStatus, SUCCEEDED_CONDITION,
};
