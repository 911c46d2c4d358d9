//! Lifecycle events emitted while a conversion runs.
//!
//! The orchestrator reports pipeline and stage transitions as
//! [`PipelineEvent`]s to an [`EventSink`]. Sinks never fail the conversion.

mod event;
mod sink;

pub use event::PipelineEvent;
pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// Emitted once before the first stage runs.
pub const PIPELINE_STARTED: &str = "pipeline.started";
/// Emitted after the last stage produced the final artifact.
pub const PIPELINE_COMPLETED: &str = "pipeline.completed";
/// Emitted when a stage failure halted the pipeline.
pub const PIPELINE_FAILED: &str = "pipeline.failed";
/// Emitted before a stage runs.
pub const STAGE_STARTED: &str = "stage.started";
/// Emitted after a stage succeeded.
pub const STAGE_COMPLETED: &str = "stage.completed";
/// Emitted after a stage failed.
pub const STAGE_FAILED: &str = "stage.failed";
/// Emitted when a stage is bypassed.
pub const STAGE_SKIPPED: &str = "stage.skipped";
