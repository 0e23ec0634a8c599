//! The closed registry of CDEvent variants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// A CDEvent variant, identified on the wire by its type string
/// (`dev.cdevents.<subject>.<predicate>.<version>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "&'static str", try_from = "String")]
pub enum CdEventType {
    PipelineRunQueued,
    PipelineRunStarted,
    PipelineRunFinished,
    TaskRunStarted,
    TaskRunFinished,
    RepositoryCreated,
    RepositoryModified,
    RepositoryDeleted,
    BranchCreated,
    BranchDeleted,
    ChangeCreated,
    ChangeUpdated,
    ChangeReviewed,
    ChangeMerged,
    ChangeAbandoned,
    BuildQueued,
    BuildStarted,
    BuildFinished,
    TestCaseQueued,
    TestCaseStarted,
    TestCaseFinished,
    TestSuiteStarted,
    TestSuiteFinished,
    ArtifactPackaged,
    ArtifactPublished,
    EnvironmentCreated,
    EnvironmentModified,
    EnvironmentDeleted,
    ServiceDeployed,
    ServiceUpgraded,
    ServiceRolledback,
    ServiceRemoved,
    ServicePublished,
}

impl CdEventType {
    /// Every registered variant.
    pub const ALL: &'static [CdEventType] = &[
        Self::PipelineRunQueued,
        Self::PipelineRunStarted,
        Self::PipelineRunFinished,
        Self::TaskRunStarted,
        Self::TaskRunFinished,
        Self::RepositoryCreated,
        Self::RepositoryModified,
        Self::RepositoryDeleted,
        Self::BranchCreated,
        Self::BranchDeleted,
        Self::ChangeCreated,
        Self::ChangeUpdated,
        Self::ChangeReviewed,
        Self::ChangeMerged,
        Self::ChangeAbandoned,
        Self::BuildQueued,
        Self::BuildStarted,
        Self::BuildFinished,
        Self::TestCaseQueued,
        Self::TestCaseStarted,
        Self::TestCaseFinished,
        Self::TestSuiteStarted,
        Self::TestSuiteFinished,
        Self::ArtifactPackaged,
        Self::ArtifactPublished,
        Self::EnvironmentCreated,
        Self::EnvironmentModified,
        Self::EnvironmentDeleted,
        Self::ServiceDeployed,
        Self::ServiceUpgraded,
        Self::ServiceRolledback,
        Self::ServiceRemoved,
        Self::ServicePublished,
    ];

    /// The CDEvents type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PipelineRunQueued => "dev.cdevents.pipelinerun.queued.0.1.0",
            Self::PipelineRunStarted => "dev.cdevents.pipelinerun.started.0.1.0",
            Self::PipelineRunFinished => "dev.cdevents.pipelinerun.finished.0.1.0",
            Self::TaskRunStarted => "dev.cdevents.taskrun.started.0.1.0",
            Self::TaskRunFinished => "dev.cdevents.taskrun.finished.0.1.0",
            Self::RepositoryCreated => "dev.cdevents.repository.created.0.1.0",
            Self::RepositoryModified => "dev.cdevents.repository.modified.0.1.0",
            Self::RepositoryDeleted => "dev.cdevents.repository.deleted.0.1.0",
            Self::BranchCreated => "dev.cdevents.branch.created.0.1.0",
            Self::BranchDeleted => "dev.cdevents.branch.deleted.0.1.0",
            Self::ChangeCreated => "dev.cdevents.change.created.0.1.0",
            Self::ChangeUpdated => "dev.cdevents.change.updated.0.1.0",
            Self::ChangeReviewed => "dev.cdevents.change.reviewed.0.1.0",
            Self::ChangeMerged => "dev.cdevents.change.merged.0.1.0",
            Self::ChangeAbandoned => "dev.cdevents.change.abandoned.0.1.0",
            Self::BuildQueued => "dev.cdevents.build.queued.0.1.0",
            Self::BuildStarted => "dev.cdevents.build.started.0.1.0",
            Self::BuildFinished => "dev.cdevents.build.finished.0.1.0",
            Self::TestCaseQueued => "dev.cdevents.testcase.queued.0.1.0",
            Self::TestCaseStarted => "dev.cdevents.testcase.started.0.1.0",
            Self::TestCaseFinished => "dev.cdevents.testcase.finished.0.1.0",
            Self::TestSuiteStarted => "dev.cdevents.testsuite.started.0.1.0",
            Self::TestSuiteFinished => "dev.cdevents.testsuite.finished.0.1.0",
            Self::ArtifactPackaged => "dev.cdevents.artifact.packaged.0.1.0",
            Self::ArtifactPublished => "dev.cdevents.artifact.published.0.1.0",
            Self::EnvironmentCreated => "dev.cdevents.environment.created.0.1.0",
            Self::EnvironmentModified => "dev.cdevents.environment.modified.0.1.0",
            Self::EnvironmentDeleted => "dev.cdevents.environment.deleted.0.1.0",
            Self::ServiceDeployed => "dev.cdevents.service.deployed.0.1.0",
            Self::ServiceUpgraded => "dev.cdevents.service.upgraded.0.1.0",
            Self::ServiceRolledback => "dev.cdevents.service.rolledback.0.1.0",
            Self::ServiceRemoved => "dev.cdevents.service.removed.0.1.0",
            Self::ServicePublished => "dev.cdevents.service.published.0.1.0",
        }
    }

    /// The subject type carried by events of this variant.
    pub fn subject_type(&self) -> &'static str {
        match self {
            Self::PipelineRunQueued | Self::PipelineRunStarted | Self::PipelineRunFinished => {
                "pipelineRun"
            }
            Self::TaskRunStarted | Self::TaskRunFinished => "taskRun",
            Self::RepositoryCreated | Self::RepositoryModified | Self::RepositoryDeleted => {
                "repository"
            }
            Self::BranchCreated | Self::BranchDeleted => "branch",
            Self::ChangeCreated
            | Self::ChangeUpdated
            | Self::ChangeReviewed
            | Self::ChangeMerged
            | Self::ChangeAbandoned => "change",
            Self::BuildQueued | Self::BuildStarted | Self::BuildFinished => "build",
            Self::TestCaseQueued | Self::TestCaseStarted | Self::TestCaseFinished => "testCase",
            Self::TestSuiteStarted | Self::TestSuiteFinished => "testSuite",
            Self::ArtifactPackaged | Self::ArtifactPublished => "artifact",
            Self::EnvironmentCreated | Self::EnvironmentModified | Self::EnvironmentDeleted => {
                "environment"
            }
            Self::ServiceDeployed
            | Self::ServiceUpgraded
            | Self::ServiceRolledback
            | Self::ServiceRemoved
            | Self::ServicePublished => "service",
        }
    }
}

impl fmt::Display for CdEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CdEventType {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| EventError::UnknownType(s.to_string()))
    }
}

impl From<CdEventType> for &'static str {
    fn from(t: CdEventType) -> Self {
        t.as_str()
    }
}

impl TryFrom<String> for CdEventType {
    type Error = EventError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
