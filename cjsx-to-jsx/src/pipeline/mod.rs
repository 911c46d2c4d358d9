//! Pipeline building and execution.
//!
//! This module provides:
//! - The orchestrator state machine
//! - A builder that checks every stage is present
//! - The sequential runner that records each stage

mod builder;
#[cfg(test)]
mod integration_tests;
mod orchestrator;
mod state;

pub use builder::PipelineBuilder;
pub use orchestrator::{ConversionPipeline, PipelineRun};
pub use state::PipelineState;
