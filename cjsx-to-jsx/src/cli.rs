//! Command-line surface.
//!
//! The fixed flags are declared here; every pass-through flag is registered
//! from the option catalog so the tables stay the single source of truth.

use crate::config::ConvertConfig;
use crate::convert::{ConversionSummary, ConvertRequest, Converter};
use crate::errors::ConvertError;
use crate::events::LoggingEventSink;
use crate::observability::LogFormat;
use crate::options::{FlatConfig, OptionCatalog, OptionDecl, OptionSet, OptionValue, ValueKind};
use clap::parser::ValueSource;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

const ARG_FILE: &str = "file";
const ARG_OUTPUT: &str = "output";
const ARG_SKIP_PRETTIER: &str = "skip-prettier";
const ARG_ESLINT_FIX: &str = "eslint-fix";
const ARG_CONFIG: &str = "config";
const ARG_VERBOSE: &str = "verbose";
const ARG_LOG_JSON: &str = "log-json";

/// Builds the command, registering every declaration in `catalog`.
#[must_use]
pub fn build_command(catalog: &OptionCatalog) -> Command {
    let command = Command::new("cjsx-to-jsx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert CJSX (CoffeeScript with JSX) files to JSX")
        .arg(
            Arg::new(ARG_FILE)
                .help("The .cjsx or .coffee file to convert")
                .value_name("FILE")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new(ARG_OUTPUT)
                .long("output")
                .short('o')
                .value_name("PATH")
                .help("Write the result here instead of next to the input"),
        )
        .arg(
            Arg::new(ARG_SKIP_PRETTIER)
                .long("skip-prettier")
                .visible_alias("skip-format")
                .help("Do not run the formatter")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_ESLINT_FIX)
                .long("eslint-fix")
                .short('e')
                .help("Run eslint --fix on the converted file")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_CONFIG)
                .long("config")
                .short('c')
                .value_name("JSON")
                .help("Read options and the toolchain from a JSON file"),
        )
        .arg(
            Arg::new(ARG_VERBOSE)
                .long("verbose")
                .short('v')
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_JSON)
                .long("log-json")
                .help("Emit logs as JSON lines")
                .action(ArgAction::SetTrue),
        );

    let command = register_set(command, &catalog.dialect, "Decaffeinate options");
    register_set(command, &catalog.format, "Prettier options")
}

fn register_set(command: Command, set: &OptionSet, heading: &'static str) -> Command {
    set.iter()
        .fold(command, |command, decl| command.arg(option_arg(decl).help_heading(heading)))
}

fn option_arg(decl: &OptionDecl) -> Arg {
    let mut help = decl.description.clone();
    if let Some(default) = &decl.default_value {
        help.push_str(&format!(" [default: {default}]"));
    }

    let arg = Arg::new(decl.lookup_key())
        .long(decl.name().to_string())
        .help(help);

    match decl.value_hint() {
        Some(hint) => arg.value_name(hint).action(ArgAction::Set),
        None => arg.action(ArgAction::SetTrue),
    }
}

/// Rebuilds the flat option record from parsed arguments.
///
/// Only flags actually given on the command line are included, so file
/// values are not overridden by absent toggles.
#[must_use]
pub fn flat_config_from_matches(matches: &ArgMatches, catalog: &OptionCatalog) -> FlatConfig {
    let mut config = FlatConfig::new();

    for decl in catalog.all_decls() {
        let id = decl.lookup_key();
        if matches.value_source(&id) != Some(ValueSource::CommandLine) {
            continue;
        }
        match decl.value_kind {
            ValueKind::Bool => config.set(id, OptionValue::Bool(true)),
            _ => {
                if let Some(value) = matches.get_one::<String>(&id) {
                    config.set(id, OptionValue::Text(value.clone()));
                }
            }
        }
    }

    config
}

/// A parsed command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// The file to convert.
    pub input: PathBuf,
    /// Explicit destination.
    pub output: Option<PathBuf>,
    /// Configuration file.
    pub config_path: Option<PathBuf>,
    /// Pass-through options given on the command line.
    pub options: FlatConfig,
    /// `--skip-prettier`.
    pub skip_format: bool,
    /// `--eslint-fix`.
    pub eslint_fix: bool,
    /// Number of `-v` flags.
    pub verbosity: u8,
    /// Log line format.
    pub log_format: LogFormat,
}

impl Invocation {
    /// Extracts an invocation from parsed arguments.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches, catalog: &OptionCatalog) -> Self {
        Self {
            input: matches
                .get_one::<String>(ARG_FILE)
                .map(PathBuf::from)
                .unwrap_or_default(),
            output: matches.get_one::<String>(ARG_OUTPUT).map(PathBuf::from),
            config_path: matches.get_one::<String>(ARG_CONFIG).map(PathBuf::from),
            options: flat_config_from_matches(matches, catalog),
            skip_format: matches.get_flag(ARG_SKIP_PRETTIER),
            eslint_fix: matches.get_flag(ARG_ESLINT_FIX),
            verbosity: matches.get_count(ARG_VERBOSE),
            log_format: if matches.get_flag(ARG_LOG_JSON) {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
        }
    }

    /// Builds the conversion request, layering the command line over the
    /// configuration file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be loaded.
    pub fn to_request(&self) -> Result<ConvertRequest, ConvertError> {
        let base = match &self.config_path {
            Some(path) => ConvertConfig::from_file(path)?,
            None => ConvertConfig::default(),
        };
        let config = base.overlay(&self.options, self.skip_format, self.eslint_fix);

        let mut request = ConvertRequest::new(&self.input).with_config(config);
        if let Some(output) = &self.output {
            request = request.with_output(output);
        }
        Ok(request)
    }
}

/// Runs an invocation against the current directory.
///
/// # Errors
///
/// Returns whatever the conversion returned.
pub async fn execute(invocation: &Invocation, catalog: OptionCatalog) -> Result<ConversionSummary, ConvertError> {
    let working_dir =
        std::env::current_dir().map_err(|e| ConvertError::io("resolve", ".", e))?;
    let request = invocation.to_request()?;
    debug!(?request, "Parsed invocation");

    Converter::new(working_dir)
        .with_catalog(catalog)
        .with_event_sink(Arc::new(LoggingEventSink))
        .convert_file(&request)
        .await
}
