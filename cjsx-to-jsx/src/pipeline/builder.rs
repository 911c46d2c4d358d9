//! Pipeline builder with validation.

use super::ConversionPipeline;
use crate::core::StageKind;
use crate::errors::PipelineValidationError;
use crate::events::{EventSink, NoOpEventSink};
use crate::stages::Stage;
use std::sync::Arc;

/// Assembles a [`ConversionPipeline`] from one stage per slot.
#[derive(Debug, Default)]
pub struct PipelineBuilder {
    macro_strip: Option<Arc<dyn Stage>>,
    dialect_convert: Option<Arc<dyn Stage>>,
    ast_rewrite: Option<Arc<dyn Stage>>,
    format: Option<Arc<dyn Stage>>,
    skip_format: bool,
    event_sink: Option<Arc<dyn EventSink>>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Places a stage in the slot matching its kind, replacing any earlier one.
    #[must_use]
    pub fn stage(mut self, stage: Arc<dyn Stage>) -> Self {
        let slot = match stage.kind() {
            StageKind::MacroStrip => &mut self.macro_strip,
            StageKind::DialectConvert => &mut self.dialect_convert,
            StageKind::AstRewrite => &mut self.ast_rewrite,
            StageKind::Format => &mut self.format,
        };
        *slot = Some(stage);
        self
    }

    /// Places several stages at once.
    #[must_use]
    pub fn stages(self, stages: impl IntoIterator<Item = Arc<dyn Stage>>) -> Self {
        stages.into_iter().fold(self, Self::stage)
    }

    /// Bypasses the format stage.
    #[must_use]
    pub fn skip_format(mut self, skip: bool) -> Self {
        self.skip_format = skip;
        self
    }

    /// Sets the sink that receives lifecycle events.
    #[must_use]
    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = Some(sink);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error naming every stage that was not supplied.
    pub fn build(self) -> Result<ConversionPipeline, PipelineValidationError> {
        let Self {
            macro_strip,
            dialect_convert,
            ast_rewrite,
            format,
            skip_format,
            event_sink,
        } = self;

        match (macro_strip, dialect_convert, ast_rewrite, format) {
            (Some(macro_strip), Some(dialect_convert), Some(ast_rewrite), Some(format)) => {
                Ok(ConversionPipeline {
                    stages: [macro_strip, dialect_convert, ast_rewrite, format],
                    skip_format,
                    event_sink: event_sink.unwrap_or_else(|| Arc::new(NoOpEventSink)),
                })
            }
            (macro_strip, dialect_convert, ast_rewrite, format) => {
                let missing: Vec<StageKind> = [
                    (StageKind::MacroStrip, macro_strip.is_none()),
                    (StageKind::DialectConvert, dialect_convert.is_none()),
                    (StageKind::AstRewrite, ast_rewrite.is_none()),
                    (StageKind::Format, format.is_none()),
                ]
                .into_iter()
                .filter_map(|(kind, absent)| absent.then_some(kind))
                .collect();

                let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
                Err(PipelineValidationError::new(format!(
                    "Pipeline is missing stages: {}",
                    names.join(", ")
                ))
                .with_stages(missing))
            }
        }
    }
}
