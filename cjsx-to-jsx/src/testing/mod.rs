//! Testing utilities for conversion pipelines.
//!
//! This module provides:
//! - Backends that script, fail, or record invocations
//! - Deterministic stand-ins for each transformer
//! - Assertions over stage outcomes and pipeline runs

mod assertions;
mod fixtures;
mod mocks;

pub use assertions::{assert_outcome_failed, assert_outcome_succeeded, assert_run_halted_at};
pub use fixtures::{fixture_backends, fixture_stages, transforms};
pub use mocks::{FailingBackend, RecordingBackend, ScriptedBackend};
