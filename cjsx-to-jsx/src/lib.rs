//! # cjsx-to-jsx
//!
//! Converts CJSX sources (CoffeeScript with embedded JSX) into JSX by
//! chaining four external transformers:
//!
//! - **Macro strip**: removes the CJSX macro syntax
//! - **Dialect convert**: turns CoffeeScript into JavaScript
//! - **AST rewrite**: turns `React.createElement` calls back into JSX
//! - **Format**: pretty-prints the result (optional)
//!
//! Each stage delegates to an [`execution::ExecutionBackend`], so the
//! pipeline can run against real tools or in-process fakes.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cjsx_to_jsx::prelude::*;
//!
//! let request = ConvertRequest::new("components/Button.cjsx")
//!     .with_config(ConvertConfig::new().overlay(&FlatConfig::new().with("tabWidth", "4"), false, false));
//!
//! let summary = Converter::new(std::env::current_dir()?)
//!     .convert_file(&request)
//!     .await?;
//! println!("wrote {}", summary.output.display());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cli;
pub mod config;
pub mod convert;
pub mod core;
pub mod errors;
pub mod events;
pub mod execution;
pub mod observability;
pub mod options;
pub mod paths;
pub mod pipeline;
pub mod postprocess;
pub mod report;
pub mod stages;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{ConvertConfig, ToolSpec, Toolchain};
    pub use crate::convert::{ConversionSummary, ConvertRequest, Converter, StageBackends};
    pub use crate::core::{
        PipelineArtifact, SourceExtension, SourceUnit, StageKind, StageOutcome, StageRecord,
        StageStatus,
    };
    pub use crate::errors::{
        ConfigError, ConvertError, EnvironmentError, PipelineValidationError, StageFailure,
    };
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink, PipelineEvent};
    pub use crate::execution::{
        BackendError, ExecutionBackend, InProcessBackend, SubprocessBackend, TransformRequest,
    };
    pub use crate::options::{
        translate, FlatConfig, OptionCatalog, OptionDecl, OptionSet, OptionValue,
        ResolvedOptions, StageOptions, ValueKind,
    };
    pub use crate::paths::{resolve_output, OutputLocation};
    pub use crate::pipeline::{ConversionPipeline, PipelineBuilder, PipelineRun, PipelineState};
    pub use crate::stages::{Stage, StageContext};
}
