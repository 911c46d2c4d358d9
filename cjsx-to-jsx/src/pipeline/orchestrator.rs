//! Sequential execution of the four stages.

use super::PipelineState;
use crate::core::{PipelineArtifact, SourceUnit, StageKind, StageOutcome, StageRecord};
use crate::errors::StageFailure;
use crate::events::{EventSink, PipelineEvent};
use crate::observability::SpanTimer;
use crate::stages::{Stage, StageContext};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Everything that happened during one run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    /// The run id.
    pub run_id: Uuid,
    /// Every state visited, starting with the initial one.
    pub states: Vec<PipelineState>,
    /// One record per stage reached, in order.
    pub records: Vec<StageRecord>,
    /// The final artifact, or the failure that halted the run.
    pub outcome: Result<PipelineArtifact, StageFailure>,
    /// Total wall-clock duration in milliseconds.
    pub duration_ms: f64,
}

impl PipelineRun {
    /// Returns the terminal state.
    #[must_use]
    pub fn final_state(&self) -> PipelineState {
        self.states
            .last()
            .copied()
            .unwrap_or(PipelineState::INITIAL)
    }

    /// Returns true if the run reached `Done`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Returns the record for a stage.
    #[must_use]
    pub fn record(&self, kind: StageKind) -> Option<&StageRecord> {
        self.records.iter().find(|record| record.stage == kind)
    }
}

/// The assembled four-stage pipeline.
///
/// Built with [`PipelineBuilder`](super::PipelineBuilder).
pub struct ConversionPipeline {
    pub(super) stages: [Arc<dyn Stage>; 4],
    pub(super) skip_format: bool,
    pub(super) event_sink: Arc<dyn EventSink>,
}

impl fmt::Debug for ConversionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionPipeline")
            .field("stages", &self.stages)
            .field("skip_format", &self.skip_format)
            .finish_non_exhaustive()
    }
}

impl ConversionPipeline {
    /// Returns true if the format stage will be bypassed.
    #[must_use]
    pub fn skips_format(&self) -> bool {
        self.skip_format
    }

    fn stage_for(&self, kind: StageKind) -> &Arc<dyn Stage> {
        match kind {
            StageKind::MacroStrip => &self.stages[0],
            StageKind::DialectConvert => &self.stages[1],
            StageKind::AstRewrite => &self.stages[2],
            StageKind::Format => &self.stages[3],
        }
    }

    /// Runs the source through every stage in order.
    ///
    /// The first failure moves the run to `Failed`; no later stage runs.
    pub async fn run(&self, source: SourceUnit, ctx: &StageContext) -> PipelineRun {
        let timer = SpanTimer::start("pipeline");
        let run_id = ctx.run_id;

        info!(
            run_id = %run_id,
            source = %source.path().display(),
            extension = %source.extension(),
            skip_format = self.skip_format,
            "Starting conversion"
        );
        self.event_sink
            .emit(&PipelineEvent::PipelineStarted {
                run_id,
                source: source.path().to_path_buf(),
                output: ctx.output_path.clone(),
            })
            .await;

        let mut state = PipelineState::INITIAL;
        let mut states = vec![state];
        let mut records = Vec::with_capacity(4);
        let mut artifact = source.into_artifact();
        let mut failure = None;

        while let Some(stage) = state.stage() {
            let started_at = Utc::now();
            let stage_timer = SpanTimer::start(stage.to_string());

            self.event_sink
                .emit(&PipelineEvent::StageStarted { run_id, stage })
                .await;

            let succeeded = match self.stage_for(stage).run(artifact, ctx).await {
                StageOutcome::Success(next) => {
                    let duration_ms = stage_timer.finish();
                    self.event_sink
                        .emit(&PipelineEvent::StageCompleted {
                            run_id,
                            stage,
                            duration_ms,
                            bytes: next.len(),
                        })
                        .await;
                    records.push(StageRecord::completed(stage, started_at, duration_ms));
                    artifact = next;
                    true
                }
                StageOutcome::Failure(stage_failure) => {
                    let duration_ms = stage_timer.finish();
                    warn!(run_id = %run_id, stage = %stage, "{} failed", stage.label());
                    self.event_sink
                        .emit(&PipelineEvent::StageFailed {
                            run_id,
                            stage,
                            error: stage_failure.message.clone(),
                            duration_ms,
                        })
                        .await;
                    records.push(StageRecord::failed(
                        stage,
                        started_at,
                        duration_ms,
                        stage_failure.message.clone(),
                    ));
                    failure = Some(stage_failure);
                    artifact = PipelineArtifact::new(String::new());
                    false
                }
            };

            let next = state.advance(succeeded, self.skip_format);
            for skipped in state.skipped_until(next) {
                self.event_sink
                    .emit(&PipelineEvent::StageSkipped {
                        run_id,
                        stage: skipped,
                    })
                    .await;
                records.push(StageRecord::skipped(skipped));
            }
            state = next;
            states.push(state);
        }

        let duration_ms = timer.finish();
        let outcome = match failure {
            Some(stage_failure) => {
                self.event_sink
                    .emit(&PipelineEvent::PipelineFailed {
                        run_id,
                        stage: stage_failure.stage,
                        duration_ms,
                    })
                    .await;
                Err(stage_failure)
            }
            None => {
                info!(run_id = %run_id, duration_ms, "Conversion finished");
                self.event_sink
                    .emit(&PipelineEvent::PipelineCompleted {
                        run_id,
                        duration_ms,
                    })
                    .await;
                Ok(artifact)
            }
        };

        PipelineRun {
            run_id,
            states,
            records,
            outcome,
            duration_ms,
        }
    }
}
