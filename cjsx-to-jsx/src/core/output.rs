//! Stage outcome type.

use super::{PipelineArtifact, StageKind};
use crate::errors::StageFailure;

/// The result of running one stage.
///
/// Once a `Failure` is produced no further stage executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced the next artifact.
    Success(PipelineArtifact),
    /// The stage rejected its input.
    Failure(StageFailure),
}

impl StageOutcome {
    /// Creates a successful outcome from text.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success(PipelineArtifact::new(text))
    }

    /// Creates a failed outcome.
    #[must_use]
    pub fn failure(stage: StageKind, message: impl Into<String>) -> Self {
        Self::Failure(StageFailure::new(stage, message))
    }

    /// Returns true if the outcome is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns the artifact, if any.
    #[must_use]
    pub fn artifact(&self) -> Option<&PipelineArtifact> {
        match self {
            Self::Success(artifact) => Some(artifact),
            Self::Failure(_) => None,
        }
    }

    /// Returns the failure, if any.
    #[must_use]
    pub fn failure_info(&self) -> Option<&StageFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure),
        }
    }

    /// Converts the outcome into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the stage failure for a `Failure` outcome.
    pub fn into_result(self) -> Result<PipelineArtifact, StageFailure> {
        match self {
            Self::Success(artifact) => Ok(artifact),
            Self::Failure(failure) => Err(failure),
        }
    }
}

impl From<Result<PipelineArtifact, StageFailure>> for StageOutcome {
    fn from(result: Result<PipelineArtifact, StageFailure>) -> Self {
        match result {
            Ok(artifact) => Self::Success(artifact),
            Err(failure) => Self::Failure(failure),
        }
    }
}
