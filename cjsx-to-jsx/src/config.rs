//! Configuration types for a conversion.
//!
//! A JSON file (`--config`) may set pass-through options, the skip and
//! eslint switches, and the program behind each stage. Command-line values
//! are layered on top.

use crate::errors::ConfigError;
use crate::execution::{locate_program, InputMode, OutputMode, ShellMode, SubprocessBackend, FILEPATH_PLACEHOLDER, INPUT_PLACEHOLDER};
use crate::options::FlatConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything that configures one conversion, apart from the paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    /// Pass-through options keyed by camel-cased flag name.
    #[serde(default)]
    pub options: FlatConfig,
    /// Bypass the format stage.
    #[serde(default)]
    pub skip_format: bool,
    /// Run `eslint --fix` on the written file.
    #[serde(default)]
    pub eslint_fix: bool,
    /// The program behind each stage.
    #[serde(default)]
    pub toolchain: Toolchain,
}

impl ConvertConfig {
    /// Creates a configuration with the default toolchain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::File` naming `origin` if the text is invalid.
    pub fn from_json_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::file(origin, e.to_string()))
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::File` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::file(path, e.to_string()))?;
        Self::from_json_str(&text, path)
    }

    /// Overlays command-line values: options merge key by key, and the
    /// switches are enabled if either side enables them.
    #[must_use]
    pub fn overlay(mut self, options: &FlatConfig, skip_format: bool, eslint_fix: bool) -> Self {
        self.options = self.options.merge(options);
        self.skip_format |= skip_format;
        self.eslint_fix |= eslint_fix;
        self
    }
}

/// The programs behind the four stages and the eslint post-processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    /// CJSX macro stripper.
    #[serde(default = "default_macro_strip")]
    pub macro_strip: ToolSpec,
    /// CoffeeScript to JavaScript converter.
    #[serde(default = "default_dialect_convert")]
    pub dialect_convert: ToolSpec,
    /// createElement to JSX rewriter.
    #[serde(default = "default_ast_rewrite")]
    pub ast_rewrite: ToolSpec,
    /// Formatter.
    #[serde(default = "default_format")]
    pub format: ToolSpec,
    /// Program run for `--eslint-fix`.
    #[serde(default = "default_eslint")]
    pub eslint: String,
}

fn default_macro_strip() -> ToolSpec {
    ToolSpec::new("cjsx-transform")
        .with_args([INPUT_PLACEHOLDER])
        .with_input(InputMode::TempFile {
            suffix: ".cjsx".to_string(),
        })
}

fn default_dialect_convert() -> ToolSpec {
    ToolSpec::new("decaffeinate").forwarding_options()
}

fn default_ast_rewrite() -> ToolSpec {
    ToolSpec::new("babel").with_args([
        "--no-babelrc",
        "--plugins",
        "transform-react-createelement-to-jsx",
    ])
}

fn default_format() -> ToolSpec {
    ToolSpec::new("prettier")
        .with_args(["--stdin-filepath", FILEPATH_PLACEHOLDER])
        .forwarding_options()
}

fn default_eslint() -> String {
    "eslint".to_string()
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            macro_strip: default_macro_strip(),
            dialect_convert: default_dialect_convert(),
            ast_rewrite: default_ast_rewrite(),
            format: default_format(),
            eslint: default_eslint(),
        }
    }
}

/// How to run one external transformer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Program name or path.
    pub program: String,
    /// Fixed arguments; may contain `{input}` and `{filepath}`.
    #[serde(default)]
    pub args: Vec<String>,
    /// How the text reaches the program.
    #[serde(default)]
    pub input: InputMode,
    /// Where the program leaves its result.
    #[serde(default)]
    pub output: OutputMode,
    /// Whether to go through the platform shell.
    #[serde(default)]
    pub shell: ShellMode,
    /// Whether the stage's resolved options are appended as flags.
    #[serde(default)]
    pub forward_options: bool,
}

impl ToolSpec {
    /// Creates a stdin-to-stdout spec with no arguments.
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

    /// Sets the fixed arguments.
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

    /// Appends resolved options as flags.
    #[must_use]
    pub fn forwarding_options(mut self) -> Self {
        self.forward_options = true;
        self
    }

    /// Builds the backend, resolving the program from `start_dir`.
    #[must_use]
    pub fn to_backend(&self, start_dir: &Path) -> SubprocessBackend {
        SubprocessBackend::new(locate_program(&self.program, start_dir))
            .with_args(self.args.iter().cloned())
            .with_input(self.input.clone())
            .with_output(self.output)
            .with_shell(self.shell)
            .forwarding_options(self.forward_options)
    }
}
