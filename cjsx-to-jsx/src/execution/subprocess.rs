//! Subprocess-backed transformers.

use super::{BackendError, CommandLine, ExecutionBackend, TransformRequest};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Replaced by the scratch file holding the artifact text.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Replaced by the path the artifact belongs to.
pub const FILEPATH_PLACEHOLDER: &str = "{filepath}";

const DEFAULT_SCRATCH_SUFFIX: &str = ".tmp";

/// How the artifact text reaches the program.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Piped to stdin.
    #[default]
    Stdin,
    /// Written to a scratch file named by `{input}`.
    TempFile {
        /// Scratch file suffix; some tools dispatch on it.
        #[serde(default = "default_suffix")]
        suffix: String,
    },
}

fn default_suffix() -> String {
    DEFAULT_SCRATCH_SUFFIX.to_string()
}

/// Where the program leaves its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Written to stdout.
    #[default]
    Stdout,
    /// Rewritten into the scratch file.
    InPlace,
}

/// Whether the command line goes through the platform shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShellMode {
    /// Spawned directly, arguments passed verbatim.
    #[default]
    Direct,
    /// Run via `sh -c` (or `cmd /C` on Windows).
    Shell,
}

/// Runs an external program for each invocation.
#[derive(Debug, Clone)]
pub struct SubprocessBackend {
    program: String,
    args: Vec<String>,
    input: InputMode,
    output: OutputMode,
    shell: ShellMode,
    forward_options: bool,
}

impl SubprocessBackend {
    /// Creates a backend that pipes stdin to stdout.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            input: InputMode::Stdin,
            output: OutputMode::Stdout,
            shell: ShellMode::Direct,
            forward_options: false,
        }
    }

    /// Sets the fixed arguments; they may contain placeholders.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the input mode.
    #[must_use]
    pub fn with_input(mut self, input: InputMode) -> Self {
        self.input = input;
        self
    }

    /// Sets the output mode.
    #[must_use]
    pub fn with_output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Sets the shell mode.
    #[must_use]
    pub fn with_shell(mut self, shell: ShellMode) -> Self {
        self.shell = shell;
        self
    }

    /// Appends the request's resolved options as flags.
    #[must_use]
    pub fn forwarding_options(mut self, forward: bool) -> Self {
        self.forward_options = forward;
        self
    }

    /// Returns the program.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    fn needs_scratch(&self) -> bool {
        matches!(self.input, InputMode::TempFile { .. }) || self.output == OutputMode::InPlace
    }

    fn scratch_suffix(&self) -> &str {
        match &self.input {
            InputMode::TempFile { suffix } => suffix.as_str(),
            InputMode::Stdin => DEFAULT_SCRATCH_SUFFIX,
        }
    }

    /// Builds the command line for a request.
    ///
    /// # Errors
    ///
    /// Returns `Misconfigured` when a placeholder has nothing to stand for.
    pub fn command_line(
        &self,
        request: &TransformRequest,
        scratch: Option<&Path>,
    ) -> Result<CommandLine, BackendError> {
        let mut args = Vec::with_capacity(self.args.len());
        for arg in &self.args {
            args.push(self.substitute(arg, request, scratch)?);
        }
        if self.forward_options {
            args.extend(request.options.to_cli_args());
        }
        Ok(CommandLine::new(self.program.clone(), args))
    }

    fn substitute(
        &self,
        arg: &str,
        request: &TransformRequest,
        scratch: Option<&Path>,
    ) -> Result<String, BackendError> {
        let mut value = arg.to_string();

        if value.contains(INPUT_PLACEHOLDER) {
            let path = scratch.ok_or_else(|| {
                BackendError::Misconfigured(format!(
                    "{} uses {INPUT_PLACEHOLDER} but reads its input from stdin",
                    self.program
                ))
            })?;
            value = value.replace(INPUT_PLACEHOLDER, &path.to_string_lossy());
        }

        if value.contains(FILEPATH_PLACEHOLDER) {
            let path = request
                .file_path
                .as_deref()
                .or(scratch)
                .ok_or_else(|| {
                    BackendError::Misconfigured(format!(
                        "{} uses {FILEPATH_PLACEHOLDER} but no file path is known",
                        self.program
                    ))
                })?;
            value = value.replace(FILEPATH_PLACEHOLDER, &path.to_string_lossy());
        }

        Ok(value)
    }

    fn build_command(&self, cmdline: &CommandLine) -> Result<Command, BackendError> {
        let cmd = match self.shell {
            ShellMode::Direct => {
                let mut cmd = Command::new(&cmdline.program);
                cmd.args(&cmdline.args);
                cmd
            }
            ShellMode::Shell if cfg!(windows) => {
                let mut cmd = Command::new("cmd");
                cmd.arg("/C").arg(cmdline.render()?);
                cmd
            }
            ShellMode::Shell => {
                let mut cmd = Command::new("sh");
                cmd.arg("-c").arg(cmdline.render()?);
                cmd
            }
        };
        Ok(cmd)
    }

    fn create_scratch(&self, text: &str) -> Result<NamedTempFile, BackendError> {
        let scratch = tempfile::Builder::new()
            .prefix("cjsx-to-jsx-")
            .suffix(self.scratch_suffix())
            .tempfile()
            .map_err(BackendError::Scratch)?;
        std::fs::write(scratch.path(), text).map_err(BackendError::Scratch)?;
        Ok(scratch)
    }
}

#[async_trait]
impl ExecutionBackend for SubprocessBackend {
    fn describe(&self) -> String {
        CommandLine::new(self.program.clone(), self.args.clone()).to_string()
    }

    async fn invoke(&self, request: &TransformRequest) -> Result<String, BackendError> {
        let scratch = if self.needs_scratch() {
            Some(self.create_scratch(&request.text)?)
        } else {
            None
        };
        let scratch_path: Option<PathBuf> = scratch.as_ref().map(|file| file.path().to_path_buf());

        let cmdline = self.command_line(request, scratch_path.as_deref())?;
        debug!(command = %cmdline, "Invoking transformer");

        let pipe_stdin = self.input == InputMode::Stdin;
        let mut child = self
            .build_command(&cmdline)?
            .stdin(if pipe_stdin { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let writer = match child.stdin.take() {
            Some(mut stdin) if pipe_stdin => {
                let bytes = request.text.clone().into_bytes();
                Some(tokio::spawn(async move {
                    stdin.write_all(&bytes).await?;
                    stdin.shutdown().await
                }))
            }
            _ => None,
        };

        let output = child
            .wait_with_output()
            .await
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(writer) = writer {
            match writer.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    debug!(program = %self.program, "Transformer closed stdin early");
                }
                Ok(Err(e)) => warn!(program = %self.program, error = %e, "Failed writing transformer stdin"),
                Err(e) => warn!(program = %self.program, error = %e, "Stdin writer task failed"),
            }
        }

        if !output.status.success() {
            return Err(BackendError::Exited {
                program: self.program.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        match (self.output, scratch_path) {
            (OutputMode::InPlace, Some(path)) => {
                tokio::fs::read_to_string(&path)
                    .await
                    .map_err(BackendError::Scratch)
            }
            (OutputMode::InPlace, None) => Err(BackendError::Misconfigured(format!(
                "{} writes in place but no scratch file exists",
                self.program
            ))),
            (OutputMode::Stdout, _) => {
                String::from_utf8(output.stdout).map_err(|_| BackendError::InvalidOutput {
                    program: self.program.clone(),
                })
            }
        }
    }
}
