use crate::core::StageKind;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use super::{
    PIPELINE_COMPLETED, PIPELINE_FAILED, PIPELINE_STARTED, STAGE_COMPLETED, STAGE_FAILED,
    STAGE_SKIPPED, STAGE_STARTED,
};

/// A lifecycle transition of one conversion run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// The run began.
    PipelineStarted {
        /// Run id.
        run_id: Uuid,
        /// Absolute input path.
        source: PathBuf,
        /// Absolute destination path.
        output: PathBuf,
    },
    /// A stage is about to run.
    StageStarted {
        /// Run id.
        run_id: Uuid,
        /// The stage.
        stage: StageKind,
    },
    /// A stage produced its artifact.
    StageCompleted {
        /// Run id.
        run_id: Uuid,
        /// The stage.
        stage: StageKind,
        /// Stage duration.
        duration_ms: f64,
        /// Size of the produced artifact.
        bytes: usize,
    },
    /// A stage failed and halted the run.
    StageFailed {
        /// Run id.
        run_id: Uuid,
        /// The stage.
        stage: StageKind,
        /// The transformer's diagnostic.
        error: String,
        /// Stage duration.
        duration_ms: f64,
    },
    /// A stage was bypassed.
    StageSkipped {
        /// Run id.
        run_id: Uuid,
        /// The stage.
        stage: StageKind,
    },
    /// Every stage succeeded.
    PipelineCompleted {
        /// Run id.
        run_id: Uuid,
        /// Total duration.
        duration_ms: f64,
    },
    /// The run ended in a stage failure.
    PipelineFailed {
        /// Run id.
        run_id: Uuid,
        /// The failing stage.
        stage: StageKind,
        /// Total duration.
        duration_ms: f64,
    },
}

impl PipelineEvent {
    /// Returns the dotted event name, e.g. `stage.completed`.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::PipelineStarted { .. } => PIPELINE_STARTED,
            Self::StageStarted { .. } => STAGE_STARTED,
            Self::StageCompleted { .. } => STAGE_COMPLETED,
            Self::StageFailed { .. } => STAGE_FAILED,
            Self::StageSkipped { .. } => STAGE_SKIPPED,
            Self::PipelineCompleted { .. } => PIPELINE_COMPLETED,
            Self::PipelineFailed { .. } => PIPELINE_FAILED,
        }
    }

    /// Returns the run the event belongs to.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::PipelineStarted { run_id, .. }
            | Self::StageStarted { run_id, .. }
            | Self::StageCompleted { run_id, .. }
            | Self::StageFailed { run_id, .. }
            | Self::StageSkipped { run_id, .. }
            | Self::PipelineCompleted { run_id, .. }
            | Self::PipelineFailed { run_id, .. } => *run_id,
        }
    }

    /// Returns the stage the event concerns, if any.
    #[must_use]
    pub fn stage(&self) -> Option<StageKind> {
        match self {
            Self::StageStarted { stage, .. }
            | Self::StageCompleted { stage, .. }
            | Self::StageFailed { stage, .. }
            | Self::StageSkipped { stage, .. }
            | Self::PipelineFailed { stage, .. } => Some(*stage),
            Self::PipelineStarted { .. } | Self::PipelineCompleted { .. } => None,
        }
    }
}
