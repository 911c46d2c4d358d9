//! User-facing success and failure reports.

use crate::errors::ConvertError;
use colored::Colorize;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Prints the final report for a conversion.
///
/// The reporter never writes the converted file.
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    color: bool,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new(std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none())
    }
}

impl Reporter {
    /// Creates a reporter.
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Renders `DONE: Converted <input> → <output>`.
    #[must_use]
    pub fn render_success(&self, input: &Path, output: &Path) -> String {
        let label = if self.color {
            "DONE:".green().bold().to_string()
        } else {
            "DONE:".to_string()
        };
        format!(
            "{label} Converted {} → {}",
            input.display(),
            output.display()
        )
    }

    /// Renders `<label>: <message>`.
    #[must_use]
    pub fn render_failure(&self, label: &str, message: &str) -> String {
        let label = format!("{label}:");
        let label = if self.color {
            label.red().bold().to_string()
        } else {
            label
        };
        format!("{label} {message}")
    }

    /// Writes the success line, normally to stdout.
    ///
    /// # Errors
    ///
    /// Returns the write error, e.g. a closed pipe.
    pub fn success(&self, out: &mut impl Write, input: &Path, output: &Path) -> io::Result<()> {
        writeln!(out, "{}", self.render_success(input, output))
    }

    /// Writes the failure line, normally to stderr.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub fn failure(&self, out: &mut impl Write, error: &ConvertError) -> io::Result<()> {
        writeln!(out, "{}", self.render_failure(&error.label(), &error.message()))
    }
}
