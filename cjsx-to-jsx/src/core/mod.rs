//! Core domain model types.
//!
//! This module contains the fundamental types used throughout the crate:
//! - Stage kind and status enums
//! - Source units and the artifacts handed between stages
//! - Stage outcomes and per-stage records

mod artifact;
mod output;
#[cfg(test)]
mod output_tests;
mod record;
mod status;

pub use artifact::{absolutize, PipelineArtifact, SourceExtension, SourceUnit};
pub use output::StageOutcome;
pub use record::StageRecord;
pub use status::{StageKind, StageStatus};
