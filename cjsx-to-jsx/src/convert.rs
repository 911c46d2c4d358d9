//! Converting one file end to end.
//!
//! [`Converter::convert_file`] resolves options and the output path before
//! any stage runs, drives the pipeline, and writes the result only when
//! every stage succeeded.

use crate::config::{ConvertConfig, Toolchain};
use crate::core::{absolutize, SourceUnit};
use crate::errors::{ConfigError, ConvertError};
use crate::events::{EventSink, NoOpEventSink};
use crate::execution::ExecutionBackend;
use crate::options::{OptionCatalog, StageOptions};
use crate::paths::resolve_output;
use crate::pipeline::{PipelineBuilder, PipelineRun};
use crate::postprocess::EslintFix;
use crate::stages::{AstRewriteStage, DialectConvertStage, FormatStage, MacroStripStage, Stage, StageContext};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// The backend behind each stage.
#[derive(Debug, Clone)]
pub struct StageBackends {
    /// Macro-strip backend.
    pub macro_strip: Arc<dyn ExecutionBackend>,
    /// Dialect-convert backend.
    pub dialect_convert: Arc<dyn ExecutionBackend>,
    /// AST-rewrite backend.
    pub ast_rewrite: Arc<dyn ExecutionBackend>,
    /// Format backend.
    pub format: Arc<dyn ExecutionBackend>,
}

impl StageBackends {
    /// Builds subprocess backends for a toolchain, resolving programs from
    /// `start_dir`.
    #[must_use]
    pub fn from_toolchain(toolchain: &Toolchain, start_dir: &Path) -> Self {
        Self {
            macro_strip: Arc::new(toolchain.macro_strip.to_backend(start_dir)),
            dialect_convert: Arc::new(toolchain.dialect_convert.to_backend(start_dir)),
            ast_rewrite: Arc::new(toolchain.ast_rewrite.to_backend(start_dir)),
            format: Arc::new(toolchain.format.to_backend(start_dir)),
        }
    }

    /// Wraps each backend in its stage adapter.
    #[must_use]
    pub fn stages(&self, options: &StageOptions) -> [Arc<dyn Stage>; 4] {
        [
            Arc::new(MacroStripStage::new(Arc::clone(&self.macro_strip))),
            Arc::new(DialectConvertStage::new(
                Arc::clone(&self.dialect_convert),
                Arc::clone(&options.dialect),
            )),
            Arc::new(AstRewriteStage::new(Arc::clone(&self.ast_rewrite))),
            Arc::new(FormatStage::new(
                Arc::clone(&self.format),
                Arc::clone(&options.format),
            )),
        ]
    }
}

/// One file to convert.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    /// The input file.
    pub input: PathBuf,
    /// Explicit destination; derived from the input when absent.
    pub output: Option<PathBuf>,
    /// Options, switches and toolchain.
    pub config: ConvertConfig,
}

impl ConvertRequest {
    /// Creates a request with the default configuration.
    #[must_use]
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: None,
            config: ConvertConfig::default(),
        }
    }

    /// Sets the explicit destination.
    #[must_use]
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: ConvertConfig) -> Self {
        self.config = config;
        self
    }
}

/// What a successful conversion produced.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    /// Absolute input path.
    pub input: PathBuf,
    /// Absolute path the result was written to.
    pub output: PathBuf,
    /// The pipeline run.
    pub run: PipelineRun,
    /// Whether `eslint --fix` ran cleanly, if it was requested.
    pub eslint_clean: Option<bool>,
}

/// Converts files relative to a working directory.
#[derive(Debug, Clone)]
pub struct Converter {
    working_dir: PathBuf,
    catalog: OptionCatalog,
    backends: Option<StageBackends>,
    event_sink: Arc<dyn EventSink>,
}

impl Converter {
    /// Creates a converter using the built-in option catalog and the
    /// configured toolchain.
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            catalog: OptionCatalog::default(),
            backends: None,
            event_sink: Arc::new(NoOpEventSink),
        }
    }

    /// Uses these backends instead of the request's toolchain.
    #[must_use]
    pub fn with_backends(mut self, backends: StageBackends) -> Self {
        self.backends = Some(backends);
        self
    }

    /// Uses a different option catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: OptionCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Sends lifecycle events to `sink`.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = sink;
        self
    }

    /// Converts one file.
    ///
    /// Configuration problems, including a destination equal to the input
    /// and a missing eslint, are reported before any stage runs. Nothing is
    /// written unless every stage succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; see [`ConvertError`].
    pub async fn convert_file(&self, request: &ConvertRequest) -> Result<ConversionSummary, ConvertError> {
        let config = &request.config;
        let options = StageOptions::resolve(&config.options, &self.catalog)?;

        let input = absolutize(&request.input, &self.working_dir);
        let location = resolve_output(&input, request.output.as_deref());
        let output = absolutize(&location.path, &self.working_dir);
        if output == input {
            return Err(ConfigError::OutputIsInput { path: input }.into());
        }

        let eslint = if config.eslint_fix {
            Some(EslintFix::locate(&config.toolchain.eslint, &self.working_dir)?)
        } else {
            None
        };

        let source = SourceUnit::read(&input, &self.working_dir).await?;
        debug!(input = %input.display(), output = %output.display(), "Resolved paths");
        if !source.extension().is_known() {
            warn!(
                input = %input.display(),
                extension = %source.extension(),
                "Input is not a .cjsx or .coffee file; converting it anyway"
            );
        }

        let backends = self
            .backends
            .clone()
            .unwrap_or_else(|| StageBackends::from_toolchain(&config.toolchain, &self.working_dir));
        let pipeline = PipelineBuilder::new()
            .stages(backends.stages(&options))
            .skip_format(config.skip_format)
            .event_sink(Arc::clone(&self.event_sink))
            .build()?;

        let ctx = StageContext::new(&input, &output);
        let run = pipeline.run(source, &ctx).await;
        match &run.outcome {
            Ok(artifact) => write_atomic(&output, artifact.text())?,
            Err(failure) => return Err(failure.clone().into()),
        }
        info!(output = %output.display(), "Wrote converted file");

        let eslint_clean = match eslint {
            Some(eslint) => Some(eslint.run(&output).await),
            None => None,
        };

        Ok(ConversionSummary {
            input,
            output,
            run,
            eslint_clean,
        })
    }
}

/// Writes `text` through a sibling temporary file, then renames it over
/// `path`.
///
/// A new file gets the same mode a plain create would (0666 less the umask);
/// an existing destination keeps its mode.
fn write_atomic(path: &Path, text: &str) -> Result<(), ConvertError> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let existing = std::fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut builder = tempfile::Builder::new();
    builder.prefix(".cjsx-to-jsx-");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let mut file = builder
        .tempfile_in(dir)
        .map_err(|e| ConvertError::io("write", path, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| ConvertError::io("write", path, e))?;
    if let Some(permissions) = existing {
        file.as_file()
            .set_permissions(permissions)
            .map_err(|e| ConvertError::io("write", path, e))?;
    }
    file.persist(path)
        .map_err(|e| ConvertError::io("write", path, e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageKind;
    use crate::execution::TransformRequest;
    use crate::options::FlatConfig;
    use crate::pipeline::PipelineState;
    use crate::testing::{assert_run_halted_at, fixture_backends, FailingBackend, RecordingBackend};
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "Hello = ->\n  <Greeting name=\"world\" />\n";

    fn workspace() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("hello.cjsx"), SOURCE).unwrap();
        dir
    }

    fn converter(dir: &Path) -> Converter {
        Converter::new(dir).with_backends(fixture_backends())
    }

    #[tokio::test]
    async fn test_default_conversion_writes_jsx() {
        let dir = workspace();
        let summary = converter(dir.path())
            .convert_file(&ConvertRequest::new("hello.cjsx"))
            .await
            .unwrap();

        assert_eq!(summary.output, dir.path().join("hello.jsx"));
        let written = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(written, "const Hello = () =>\n  <Greeting name=\"world\" />;\n");
        assert!(!written.contains("React.createElement"));
        assert_eq!(summary.run.final_state(), PipelineState::Done);
        assert_eq!(summary.eslint_clean, None);
    }

    #[tokio::test]
    async fn test_coffee_becomes_js() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("util.coffee"), "x = 1\n").unwrap();

        let summary = converter(dir.path())
            .convert_file(&ConvertRequest::new("util.coffee"))
            .await
            .unwrap();
        assert_eq!(summary.output, dir.path().join("util.js"));
        assert_eq!(std::fs::read_to_string(summary.output).unwrap(), "x = 1;\n");
    }

    #[tokio::test]
    async fn test_stage_failure_writes_nothing() {
        let dir = workspace();
        let backends = StageBackends {
            macro_strip: Arc::new(FailingBackend::new("Parse error on line 2")),
            ..fixture_backends()
        };

        let err = Converter::new(dir.path())
            .with_backends(backends)
            .convert_file(&ConvertRequest::new("hello.cjsx"))
            .await
            .unwrap_err();

        assert_eq!(err.label(), "CJSX Transform Error");
        assert_eq!(err.message(), "Parse error on line 2");
        assert_eq!(err.exit_code(), 1);
        assert!(!dir.path().join("hello.jsx").exists());
    }

    #[tokio::test]
    async fn test_invalid_option_fails_before_any_stage() {
        let dir = workspace();
        let macro_strip = Arc::new(RecordingBackend::new(|req: &TransformRequest| Ok(req.text.clone())));
        let backends = StageBackends {
            macro_strip: macro_strip.clone(),
            ..fixture_backends()
        };
        let config = ConvertConfig {
            options: FlatConfig::new().with("tabWidth", "abc"),
            ..ConvertConfig::default()
        };

        let err = Converter::new(dir.path())
            .with_backends(backends)
            .convert_file(&ConvertRequest::new("hello.cjsx").with_config(config))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
        assert!(err.message().contains("--tab-width"));
        assert_eq!(macro_strip.calls(), 0);
    }

    #[tokio::test]
    async fn test_output_equal_to_input_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let err = converter(dir.path())
            .convert_file(&ConvertRequest::new("notes.txt"))
            .await
            .unwrap_err();
        assert!(matches!(err, ConvertError::Config(ConfigError::OutputIsInput { .. })));
    }

    #[tokio::test]
    async fn test_unrecognised_extension_converts_with_explicit_output() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), SOURCE).unwrap();

        let summary = converter(dir.path())
            .convert_file(&ConvertRequest::new("notes.txt").with_output("notes.jsx"))
            .await
            .unwrap();
        assert_eq!(summary.output, dir.path().join("notes.jsx"));
        assert!(summary.output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_new_output_gets_regular_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.jsx");
        std::fs::write(&plain, "x").unwrap();
        let output = dir.path().join("out.jsx");
        write_atomic(&output, "x").unwrap();

        let mode = |path: &Path| std::fs::metadata(path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&output), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_output_keeps_its_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.jsx");
        std::fs::write(&output, "old").unwrap();
        std::fs::set_permissions(&output, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&output, "new").unwrap();

        let mode = std::fs::metadata(&output).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "new");
    }

    #[tokio::test]
    async fn test_missing_input_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = converter(dir.path())
            .convert_file(&ConvertRequest::new("missing.cjsx"))
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("missing.cjsx"));
    }

    #[tokio::test]
    async fn test_missing_eslint_fails_before_any_stage() {
        let dir = workspace();
        let mut config = ConvertConfig::default();
        config.eslint_fix = true;
        config.toolchain.eslint = "definitely-not-eslint-xyz".to_string();

        let err = converter(dir.path())
            .convert_file(&ConvertRequest::new("hello.cjsx").with_config(config))
            .await
            .unwrap_err();

        assert_eq!(err.label(), "Environment Error");
        assert_eq!(err.exit_code(), 3);
        assert!(!dir.path().join("hello.jsx").exists());
    }

    #[tokio::test]
    async fn test_explicit_output_and_skip_format() {
        let dir = workspace();
        let format = Arc::new(RecordingBackend::new(|req: &TransformRequest| Ok(req.text.clone())));
        let backends = StageBackends {
            format: format.clone(),
            ..fixture_backends()
        };
        let config = ConvertConfig {
            skip_format: true,
            ..ConvertConfig::default()
        };

        let summary = Converter::new(dir.path())
            .with_backends(backends)
            .convert_file(
                &ConvertRequest::new("hello.cjsx")
                    .with_output("out.js")
                    .with_config(config),
            )
            .await
            .unwrap();

        assert_eq!(summary.output, dir.path().join("out.js"));
        assert_eq!(format.calls(), 0);
        assert!(summary.run.records.iter().any(|r| r.stage == StageKind::Format));
    }

    #[tokio::test]
    async fn test_format_sees_output_path_and_options() {
        let dir = workspace();
        let format = Arc::new(RecordingBackend::new(crate::testing::transforms::format));
        let backends = StageBackends {
            format: format.clone(),
            ..fixture_backends()
        };
        let config = ConvertConfig {
            options: FlatConfig::new().with("tabWidth", "4"),
            ..ConvertConfig::default()
        };

        let summary = Converter::new(dir.path())
            .with_backends(backends)
            .convert_file(&ConvertRequest::new("hello.cjsx").with_config(config))
            .await
            .unwrap();

        let request = &format.requests()[0];
        assert_eq!(request.file_path.as_deref(), Some(summary.output.as_path()));
        let written = std::fs::read_to_string(&summary.output).unwrap();
        assert_eq!(written, "const Hello = () =>\n    <Greeting name=\"world\" />;\n");
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let dir = workspace();
        let converter = converter(dir.path());
        let request = ConvertRequest::new("hello.cjsx");

        let first = converter.convert_file(&request).await.unwrap();
        let first_text = std::fs::read_to_string(&first.output).unwrap();
        let second = converter.convert_file(&request).await.unwrap();
        let second_text = std::fs::read_to_string(&second.output).unwrap();

        assert_eq!(first_text, second_text);
    }

    #[tokio::test]
    async fn test_failure_run_halts_at_stage() {
        let backends = StageBackends {
            dialect_convert: Arc::new(FailingBackend::new("unexpected indentation")),
            ..fixture_backends()
        };
        let options = StageOptions::default();
        let pipeline = PipelineBuilder::new()
            .stages(backends.stages(&options))
            .build()
            .unwrap();

        let source = SourceUnit::new("a.cjsx", Path::new("/w"), SOURCE);
        let run = pipeline.run(source, &StageContext::new("/w/a.cjsx", "/w/a.jsx")).await;
        assert_run_halted_at(&run, StageKind::DialectConvert);
    }
}
