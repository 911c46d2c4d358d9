//! Test assertions for stage outcomes and runs.

use crate::core::{StageKind, StageOutcome};
use crate::pipeline::{PipelineRun, PipelineState};

/// Asserts that the outcome is a success.
pub fn assert_outcome_succeeded(outcome: &StageOutcome) {
    assert!(
        outcome.is_success(),
        "Expected success, got failure: {:?}",
        outcome.failure_info()
    );
}

/// Asserts that the outcome failed in `stage`.
pub fn assert_outcome_failed(outcome: &StageOutcome, stage: StageKind) {
    match outcome.failure_info() {
        Some(failure) => assert_eq!(
            failure.stage, stage,
            "Expected {stage} to fail, but {} failed",
            failure.stage
        ),
        None => panic!("Expected {stage} to fail, but the outcome succeeded"),
    }
}

/// Asserts that the run ended in `Failed` right after `stage`.
pub fn assert_run_halted_at(run: &PipelineRun, stage: StageKind) {
    assert_eq!(run.final_state(), PipelineState::Failed, "Run did not fail");

    let last_stage = run
        .states
        .iter()
        .rev()
        .find_map(|state| state.stage());
    assert_eq!(last_stage, Some(stage), "Run halted at the wrong stage");

    match &run.outcome {
        Err(failure) => assert_eq!(failure.stage, stage),
        Ok(_) => panic!("Run failed without a stage failure"),
    }
}
