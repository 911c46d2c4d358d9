//! The orchestrator's state machine.

use crate::core::StageKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a conversion currently is.
///
/// `Done` and `Failed` are terminal; `Failed` is reachable from every
/// stage state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// About to strip CJSX macros.
    MacroStrip,
    /// About to convert CoffeeScript to JavaScript.
    DialectConvert,
    /// About to rewrite element calls into JSX.
    AstRewrite,
    /// About to format.
    Format,
    /// The final artifact is ready.
    Done,
    /// A stage failed.
    Failed,
}

impl PipelineState {
    /// The state every run starts in.
    pub const INITIAL: Self = Self::MacroStrip;

    /// Returns the state after the current one finished.
    ///
    /// `skip_format` passes over every skippable stage, so `AstRewrite` goes
    /// straight to `Done`. Terminal states never move.
    #[must_use]
    pub fn advance(self, succeeded: bool, skip_format: bool) -> Self {
        if self.is_terminal() {
            return self;
        }
        if !succeeded {
            return Self::Failed;
        }
        let mut next = self.successor();
        while skip_format && next.stage().is_some_and(|kind| kind.is_skippable()) {
            next = next.successor();
        }
        next
    }

    /// Returns the stages passed over on the way from this state to `next`.
    ///
    /// Empty when `next` is the direct successor, or when the run failed.
    #[must_use]
    pub fn skipped_until(self, next: Self) -> Vec<StageKind> {
        let mut skipped = Vec::new();
        if self.is_terminal() || next == Self::Failed {
            return skipped;
        }
        let mut state = self.successor();
        while state != next && !state.is_terminal() {
            skipped.extend(state.stage());
            state = state.successor();
        }
        skipped
    }

    fn successor(self) -> Self {
        match self {
            Self::MacroStrip => Self::DialectConvert,
            Self::DialectConvert => Self::AstRewrite,
            Self::AstRewrite => Self::Format,
            Self::Format | Self::Done => Self::Done,
            Self::Failed => Self::Failed,
        }
    }

    /// Returns the stage run in this state, if any.
    #[must_use]
    pub fn stage(self) -> Option<StageKind> {
        match self {
            Self::MacroStrip => Some(StageKind::MacroStrip),
            Self::DialectConvert => Some(StageKind::DialectConvert),
            Self::AstRewrite => Some(StageKind::AstRewrite),
            Self::Format => Some(StageKind::Format),
            Self::Done | Self::Failed => None,
        }
    }

    /// Returns true for `Done` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Done => write!(f, "done"),
            Self::Failed => write!(f, "failed"),
            other => match other.stage() {
                Some(kind) => write!(f, "{kind}"),
                None => Ok(()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = PipelineState::INITIAL;
        let mut visited = vec![state];
        while !state.is_terminal() {
            state = state.advance(true, false);
            visited.push(state);
        }

        assert_eq!(
            visited,
            vec![
                PipelineState::MacroStrip,
                PipelineState::DialectConvert,
                PipelineState::AstRewrite,
                PipelineState::Format,
                PipelineState::Done,
            ]
        );
    }

    #[test]
    fn test_skip_format_goes_to_done() {
        assert_eq!(PipelineState::AstRewrite.advance(true, true), PipelineState::Done);
        assert_eq!(PipelineState::DialectConvert.advance(true, true), PipelineState::AstRewrite);
    }

    #[test]
    fn test_skipped_until_lists_bypassed_stages() {
        let next = PipelineState::AstRewrite.advance(true, true);
        assert_eq!(PipelineState::AstRewrite.skipped_until(next), vec![StageKind::Format]);

        let next = PipelineState::AstRewrite.advance(true, false);
        assert!(PipelineState::AstRewrite.skipped_until(next).is_empty());
        assert!(PipelineState::MacroStrip
            .skipped_until(PipelineState::Failed)
            .is_empty());
        assert!(PipelineState::Done.skipped_until(PipelineState::Done).is_empty());
    }

    #[test]
    fn test_failure_is_absorbing() {
        for state in [
            PipelineState::MacroStrip,
            PipelineState::DialectConvert,
            PipelineState::AstRewrite,
            PipelineState::Format,
        ] {
            assert_eq!(state.advance(false, false), PipelineState::Failed);
        }
        assert_eq!(PipelineState::Failed.advance(true, false), PipelineState::Failed);
        assert_eq!(PipelineState::Done.advance(false, false), PipelineState::Done);
    }

    #[test]
    fn test_display() {
        assert_eq!(PipelineState::DialectConvert.to_string(), "dialect_convert");
        assert_eq!(PipelineState::Failed.to_string(), "failed");
    }
}
