//! Tests for StageOutcome.

#[cfg(test)]
mod tests {
    use crate::core::{PipelineArtifact, StageKind, StageOutcome};
    use crate::errors::StageFailure;

    #[test]
    fn test_outcome_success() {
        let outcome = StageOutcome::success("const a = 1;");
        assert!(outcome.is_success());
        assert_eq!(outcome.artifact().map(PipelineArtifact::text), Some("const a = 1;"));
        assert!(outcome.failure_info().is_none());
    }

    #[test]
    fn test_outcome_failure() {
        let outcome = StageOutcome::failure(StageKind::MacroStrip, "unterminated tag");
        assert!(!outcome.is_success());
        assert!(outcome.artifact().is_none());

        let failure = outcome.failure_info().unwrap();
        assert_eq!(failure.stage, StageKind::MacroStrip);
        assert_eq!(failure.message, "unterminated tag");
    }

    #[test]
    fn test_outcome_into_result() {
        let ok = StageOutcome::success("x").into_result().unwrap();
        assert_eq!(ok.text(), "x");

        let err = StageOutcome::failure(StageKind::Format, "bad").into_result().unwrap_err();
        assert_eq!(err, StageFailure::new(StageKind::Format, "bad"));
    }

    #[test]
    fn test_outcome_from_result() {
        let outcome: StageOutcome = Err(StageFailure::new(StageKind::AstRewrite, "boom")).into();
        assert!(!outcome.is_success());

        let outcome: StageOutcome = Ok(PipelineArtifact::new("y")).into();
        assert!(outcome.is_success());
    }
}
