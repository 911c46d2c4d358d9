//! Optional `eslint --fix` on the written file.

use crate::errors::EnvironmentError;
use crate::execution::find_program;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// The flag that requests the post-processor.
pub const ESLINT_FIX_FLAG: &str = "--eslint-fix";

/// A located eslint program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EslintFix {
    program: PathBuf,
}

impl EslintFix {
    /// Locates `program` from `start_dir`.
    ///
    /// # Errors
    ///
    /// Returns an `EnvironmentError` if it cannot be found.
    pub fn locate(program: &str, start_dir: &Path) -> Result<Self, EnvironmentError> {
        find_program(program, start_dir)
            .map(|program| Self { program })
            .ok_or_else(|| EnvironmentError::missing("eslint", ESLINT_FIX_FLAG))
    }

    /// Returns the resolved program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs `eslint --fix <file>`.
    ///
    /// Returns true if eslint exited successfully. A failure to start or a
    /// non-zero exit is logged and otherwise ignored, because the file has
    /// already been written.
    pub async fn run(&self, file: &Path) -> bool {
        debug!(program = %self.program.display(), file = %file.display(), "Running eslint --fix");
        let output = Command::new(&self.program)
            .arg("--fix")
            .arg(file)
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                info!(file = %file.display(), "eslint --fix finished");
                true
            }
            Ok(output) => {
                warn!(
                    file = %file.display(),
                    code = ?output.status.code(),
                    stdout = %String::from_utf8_lossy(&output.stdout).trim_end(),
                    "eslint --fix reported problems"
                );
                false
            }
            Err(e) => {
                warn!(program = %self.program.display(), error = %e, "Could not run eslint");
                false
            }
        }
    }
}
