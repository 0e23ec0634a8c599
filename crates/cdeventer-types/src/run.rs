//! The Run resource: a generic custom-task request.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `apiVersion` of the custom task reference handled by cdeventer.
pub const CDEVENT_API_VERSION: &str = "custom.tekton.dev/v0";

/// `kind` of the custom task reference handled by cdeventer.
pub const CDEVENT_KIND: &str = "CDEvent";

/// Condition type that carries the Run outcome.
pub const SUCCEEDED_CONDITION: &str = "Succeeded";

fn default_api_version() -> String {
    "tekton.dev/v1alpha1".to_string()
}

fn default_kind() -> String {
    "Run".to_string()
}

/// A custom-task Run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: RunSpec,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RunStatus>,
}

/// Resource identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_namespace() -> String {
    "default".to_string()
}

/// Desired state of a Run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSpec {
    #[serde(default, rename = "ref", skip_serializing_if = "Option::is_none")]
    pub run_ref: Option<RunRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<Param>,
}

/// Reference to the custom task implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRef {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
}

impl RunRef {
    /// Reference to the cdeventer custom task.
    pub fn cdevent() -> Self {
        Self {
            api_version: CDEVENT_API_VERSION.to_string(),
            kind: CDEVENT_KIND.to_string(),
            name: String::new(),
        }
    }

    /// Whether this reference points at the given `apiVersion`/`kind` pair.
    pub fn matches(&self, api_version: &str, kind: &str) -> bool {
        self.api_version == api_version && self.kind == kind
    }
}

/// A named parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub value: ParamValue,
}

impl Param {
    /// Build an object-typed parameter from key/value pairs.
    pub fn object<K, V>(name: impl Into<String>, entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            value: ParamValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Build a string-typed parameter.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParamValue::String(value.into()),
        }
    }
}

/// A parameter value. The variant is inferred from the JSON/YAML shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    String(String),
    Array(Vec<String>),
    Object(BTreeMap<String, String>),
}

impl ParamValue {
    pub fn param_type(&self) -> ParamType {
        match self {
            Self::String(_) => ParamType::String,
            Self::Array(_) => ParamType::Array,
            Self::Object(_) => ParamType::Object,
        }
    }
}

/// Type tag of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Array,
    Object,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(s)
    }
}

/// Observed state of a Run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStatus {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// A status condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<DateTime<Utc>>,
}

/// Tri-state condition status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl Run {
    /// Create a Run referencing the cdeventer custom task.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: default_api_version(),
            kind: default_kind(),
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
            },
            spec: RunSpec {
                run_ref: Some(RunRef::cdevent()),
                params: Vec::new(),
            },
            status: None,
        }
    }

    /// Append a parameter.
    pub fn with_param(mut self, param: Param) -> Self {
        self.spec.params.push(param);
        self
    }

    /// `namespace/name` key used in logs.
    pub fn key(&self) -> String {
        format!("{}/{}", self.metadata.namespace, self.metadata.name)
    }

    /// The `Succeeded` condition, if any.
    pub fn succeeded_condition(&self) -> Option<&Condition> {
        self.status
            .as_ref()?
            .conditions
            .iter()
            .find(|c| c.condition_type == SUCCEEDED_CONDITION)
    }

    /// Whether the Run has reached a terminal state.
    pub fn is_done(&self) -> bool {
        self.succeeded_condition()
            .is_some_and(|c| c.status != ConditionStatus::Unknown)
    }

    /// Whether the Run finished successfully.
    pub fn is_successful(&self) -> bool {
        self.succeeded_condition()
            .is_some_and(|c| c.status == ConditionStatus::True)
    }

    /// Mark the Run as succeeded.
    pub fn mark_succeeded(&mut self, reason: impl Into<String>, message: impl Into<String>) {
        self.set_succeeded_condition(ConditionStatus::True, reason.into(), message.into());
    }

    /// Mark the Run as failed.
    pub fn mark_failed(&mut self, reason: impl Into<String>, message: impl Into<String>) {
        self.set_succeeded_condition(ConditionStatus::False, reason.into(), message.into());
    }

    fn set_succeeded_condition(&mut self, status: ConditionStatus, reason: String, message: String) {
        let condition = Condition {
            condition_type: SUCCEEDED_CONDITION.to_string(),
            status,
            reason,
            message,
            last_transition_time: Some(Utc::now()),
        };
        let run_status = self.status.get_or_insert_with(RunStatus::default);
        match run_status
            .conditions
            .iter_mut()
            .find(|c| c.condition_type == SUCCEEDED_CONDITION)
        {
            Some(existing) => *existing = condition,
            None => run_status.conditions.push(condition),
        }
    }
}
