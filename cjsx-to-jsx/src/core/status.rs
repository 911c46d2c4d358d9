//! Stage kind and status enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The four transformation stages, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    /// Expands CJSX element macros into plain CoffeeScript calls.
    MacroStrip,
    /// Converts CoffeeScript to JavaScript.
    DialectConvert,
    /// Rewrites element-construction calls into JSX syntax.
    AstRewrite,
    /// Reformats the resulting JavaScript/JSX.
    Format,
}

impl StageKind {
    /// All stages in execution order.
    pub const ALL: [Self; 4] = [
        Self::MacroStrip,
        Self::DialectConvert,
        Self::AstRewrite,
        Self::Format,
    ];

    /// Returns the user-facing label of the stage.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::MacroStrip => "CJSX Transform",
            Self::DialectConvert => "Decaffeinate",
            Self::AstRewrite => "Babel",
            Self::Format => "Prettier",
        }
    }

    /// Returns true if the user may skip this stage.
    #[must_use]
    pub fn is_skippable(&self) -> bool {
        matches!(self, Self::Format)
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MacroStrip => write!(f, "macro_strip"),
            Self::DialectConvert => write!(f, "dialect_convert"),
            Self::AstRewrite => write!(f, "ast_rewrite"),
            Self::Format => write!(f, "format"),
        }
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Stage completed successfully.
    Ok,
    /// Stage was bypassed.
    Skip,
    /// Stage failed.
    Fail,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Skip => write!(f, "skip"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_kind_display() {
        assert_eq!(StageKind::MacroStrip.to_string(), "macro_strip");
        assert_eq!(StageKind::DialectConvert.to_string(), "dialect_convert");
        assert_eq!(StageKind::AstRewrite.to_string(), "ast_rewrite");
        assert_eq!(StageKind::Format.to_string(), "format");
    }

    #[test]
    fn test_stage_labels() {
        assert_eq!(StageKind::MacroStrip.label(), "CJSX Transform");
        assert_eq!(StageKind::Format.label(), "Prettier");
    }

    #[test]
    fn test_only_format_is_skippable() {
        let skippable: Vec<_> = StageKind::ALL
            .iter()
            .filter(|kind| kind.is_skippable())
            .collect();
        assert_eq!(skippable, vec![&StageKind::Format]);
    }

    #[test]
    fn test_stage_status_serialize() {
        let json = serde_json::to_string(&StageStatus::Skip).unwrap();
        assert_eq!(json, r#""skip""#);
    }
}
