//! Error types for the conversion pipeline.
//!
//! Failures fall into four families that are reported with distinct labels
//! and exit codes: configuration errors (caught before any stage runs),
//! stage failures, environment errors for optional tools, and I/O errors.

use crate::core::StageKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The main error type for a conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An option value or config file could not be used.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// A transformer stage rejected its input or terminated abnormally.
    #[error("{0}")]
    Stage(#[from] StageFailure),

    /// An explicitly requested optional tool is not available.
    #[error("{0}")]
    Environment(#[from] EnvironmentError),

    /// The pipeline was assembled incorrectly.
    #[error("{0}")]
    Pipeline(#[from] PipelineValidationError),

    /// Reading the source or writing the destination failed.
    #[error("Could not {action} {}: {source}", path.display())]
    Io {
        /// What was being attempted ("read", "write", ...).
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// Creates an I/O error for the given action and path.
    #[must_use]
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// Returns the label used when reporting this error.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Config(_) => "Configuration Error".to_string(),
            Self::Stage(failure) => format!("{} Error", failure.stage.label()),
            Self::Environment(_) => "Environment Error".to_string(),
            Self::Pipeline(_) => "Pipeline Error".to_string(),
            Self::Io { .. } => "I/O Error".to_string(),
        }
    }

    /// Returns the message shown under the label.
    ///
    /// Stage failures surface the transformer's diagnostic verbatim.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Stage(failure) => failure.message.clone(),
            other => other.to_string(),
        }
    }

    /// Returns the process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Stage(_) | Self::Pipeline(_) => 1,
            Self::Config(_) => 2,
            Self::Environment(_) => 3,
            Self::Io { .. } => 4,
        }
    }
}

/// Errors raised while translating configuration into stage options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// An integer flag received text that is not a base-10 integer.
    #[error("Invalid value '{value}' for {flag}: expected an integer")]
    InvalidInteger {
        /// The external flag spelling.
        flag: String,
        /// The offending value.
        value: String,
    },

    /// An enumerated flag received a value outside its choices.
    #[error("Invalid value '{value}' for {flag}: expected one of {}", choices.join(", "))]
    InvalidChoice {
        /// The external flag spelling.
        flag: String,
        /// The offending value.
        value: String,
        /// The accepted values.
        choices: Vec<String>,
    },

    /// A value of the wrong type was supplied.
    #[error("Invalid value '{value}' for {flag}: expected {expected}")]
    TypeMismatch {
        /// The external flag spelling.
        flag: String,
        /// The expected kind of value.
        expected: &'static str,
        /// The offending value.
        value: String,
    },

    /// A toggle was set to `false` but the tool has no flag that turns it off.
    #[error("{flag} cannot be set to false: it has no negated form; remove it to keep the tool's default")]
    NotNegatable {
        /// The external flag spelling.
        flag: String,
    },

    /// An option set declares the same flag twice.
    #[error("Option set '{set}' declares {flag} more than once")]
    DuplicateFlag {
        /// The option set name.
        set: String,
        /// The repeated flag.
        flag: String,
    },

    /// A configuration file could not be read or parsed.
    #[error("Invalid configuration file {}: {message}", path.display())]
    File {
        /// The configuration file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The derived output path would overwrite the input.
    #[error("Refusing to overwrite the input file {}; pass --output to choose a destination", path.display())]
    OutputIsInput {
        /// The input path.
        path: PathBuf,
    },
}

impl ConfigError {
    /// Creates a config file error.
    #[must_use]
    pub fn file(path: &Path, message: impl Into<String>) -> Self {
        Self::File {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}

/// A stage rejected its input or its transformer terminated abnormally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} failed: {message}", stage.label())]
pub struct StageFailure {
    /// The stage that failed.
    pub stage: StageKind,
    /// The transformer's diagnostic text.
    pub message: String,
}

impl StageFailure {
    /// Creates a new stage failure.
    #[must_use]
    pub fn new(stage: StageKind, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }

    /// Returns the label of the failed stage.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.stage.label()
    }
}

/// A requested optional capability cannot be located.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{tool} must be present when specifying {feature}")]
pub struct EnvironmentError {
    /// The missing tool.
    pub tool: String,
    /// The flag that requested it.
    pub feature: String,
}

impl EnvironmentError {
    /// Creates an error for a missing tool.
    #[must_use]
    pub fn missing(tool: impl Into<String>, feature: impl Into<String>) -> Self {
        Self {
            tool: tool.into(),
            feature: feature.into(),
        }
    }
}

/// Error raised when a pipeline is assembled without all of its stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PipelineValidationError {
    /// The error message.
    pub message: String,
    /// The stages involved in the error.
    pub stages: Vec<StageKind>,
}

impl PipelineValidationError {
    /// Creates a new pipeline validation error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stages: Vec::new(),
        }
    }

    /// Sets the stages involved.
    #[must_use]
    pub fn with_stages(mut self, stages: Vec<StageKind>) -> Self {
        self.stages = stages;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_failure_label_and_message() {
        let err = ConvertError::from(StageFailure::new(
            StageKind::DialectConvert,
            "unexpected indentation",
        ));

        assert_eq!(err.label(), "Decaffeinate Error");
        assert_eq!(err.message(), "unexpected indentation");
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_config_error_mentions_flag() {
        let err = ConvertError::from(ConfigError::InvalidInteger {
            flag: "--tab-width".to_string(),
            value: "four".to_string(),
        });

        assert_eq!(err.label(), "Configuration Error");
        assert!(err.message().contains("--tab-width"));
        assert!(err.message().contains("four"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_environment_error_is_distinct() {
        let err = ConvertError::from(EnvironmentError::missing("eslint", "--eslint-fix"));

        assert_eq!(err.label(), "Environment Error");
        assert_eq!(
            err.message(),
            "eslint must be present when specifying --eslint-fix"
        );
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_io_error_display() {
        let err = ConvertError::io(
            "read",
            "missing.cjsx",
            std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        );

        assert_eq!(err.label(), "I/O Error");
        assert!(err.to_string().contains("missing.cjsx"));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_invalid_choice_lists_choices() {
        let err = ConfigError::InvalidChoice {
            flag: "--trailing-comma".to_string(),
            value: "some".to_string(),
            choices: vec!["none".to_string(), "es5".to_string(), "all".to_string()],
        };

        assert!(err.to_string().contains("none, es5, all"));
    }

    #[test]
    fn test_pipeline_validation_error() {
        let err = PipelineValidationError::new("missing stage")
            .with_stages(vec![StageKind::Format]);

        assert_eq!(err.stages, vec![StageKind::Format]);
        assert_eq!(ConvertError::from(err).exit_code(), 1);
    }
}
