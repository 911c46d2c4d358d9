//! How a stage's transformer is actually invoked.
//!
//! Each stage adapter owns one [`ExecutionBackend`]. A backend either runs
//! an external program ([`SubprocessBackend`]) or calls a Rust function
//! ([`InProcessBackend`]). Adapters never see which.

mod command;
mod in_process;
mod locate;
mod subprocess;

pub use command::CommandLine;
pub use in_process::{InProcessBackend, TransformFn};
pub use locate::{find_program, locate_program};
pub use subprocess::{InputMode, OutputMode, ShellMode, SubprocessBackend, FILEPATH_PLACEHOLDER, INPUT_PLACEHOLDER};

use crate::options::ResolvedOptions;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Everything a transformer receives for one invocation.
#[derive(Debug, Clone)]
pub struct TransformRequest {
    /// The artifact text.
    pub text: String,
    /// Options forwarded to the transformer.
    pub options: Arc<ResolvedOptions>,
    /// The file the text belongs to, for tools that infer settings from it.
    pub file_path: Option<PathBuf>,
}

impl TransformRequest {
    /// Creates a request with no options and no file path.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            options: Arc::new(ResolvedOptions::empty()),
            file_path: None,
        }
    }

    /// Sets the forwarded options.
    #[must_use]
    pub fn with_options(mut self, options: Arc<ResolvedOptions>) -> Self {
        self.options = options;
        self
    }

    /// Sets the file path hint.
    #[must_use]
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }
}

/// Why a backend could not produce output.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The program could not be started.
    #[error("Failed to start {program}: {source}")]
    Spawn {
        /// The program name.
        program: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("{program} exited with status {}", code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Exited {
        /// The program name.
        program: String,
        /// The exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Everything the program wrote to stderr.
        stderr: String,
    },

    /// An in-process transformer returned an error.
    #[error("{0}")]
    Raised(String),

    /// The program's output was not valid UTF-8.
    #[error("{program} produced output that is not valid UTF-8")]
    InvalidOutput {
        /// The program name.
        program: String,
    },

    /// A scratch file could not be created, written or read.
    #[error("Scratch file error: {0}")]
    Scratch(#[source] std::io::Error),

    /// The backend was configured in a way that cannot run.
    #[error("{0}")]
    Misconfigured(String),
}

impl BackendError {
    /// Returns the text reported to the user for this error.
    ///
    /// A failed program's stderr is returned verbatim when it wrote any.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match self {
            Self::Exited { stderr, .. } if !stderr.trim().is_empty() => stderr.trim_end().to_string(),
            other => other.to_string(),
        }
    }
}

/// A transformer invocation strategy.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionBackend: Send + Sync + std::fmt::Debug {
    /// Describes the backend for logs, e.g. the command line.
    fn describe(&self) -> String;

    /// Transforms the request text.
    async fn invoke(&self, request: &TransformRequest) -> Result<String, BackendError>;
}
