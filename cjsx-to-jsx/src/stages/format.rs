use super::{delegate, request_for, Stage, StageContext};
use crate::core::{PipelineArtifact, StageKind, StageOutcome};
use crate::execution::ExecutionBackend;
use crate::options::ResolvedOptions;
use async_trait::async_trait;
use std::sync::Arc;

/// Reformats the final JavaScript/JSX.
///
/// The transformer sees the eventual output path so it can pick a parser
/// and profile by extension. The orchestrator bypasses this stage entirely
/// when formatting is skipped.
#[derive(Debug, Clone)]
pub struct FormatStage {
    backend: Arc<dyn ExecutionBackend>,
    options: Arc<ResolvedOptions>,
}

impl FormatStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>, options: Arc<ResolvedOptions>) -> Self {
        Self { backend, options }
    }
}

#[async_trait]
impl Stage for FormatStage {
    fn kind(&self) -> StageKind {
        StageKind::Format
    }

    async fn run(&self, artifact: PipelineArtifact, ctx: &StageContext) -> StageOutcome {
        let request = request_for(artifact, &ctx.output_path).with_options(Arc::clone(&self.options));
        delegate(self.kind(), self.backend.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::MockExecutionBackend;
    use crate::options::{prettier_options, translate, FlatConfig, OptionValue};
    use std::path::Path;

    #[tokio::test]
    async fn test_format_receives_options_and_output_path() {
        let options = translate(
            &FlatConfig::new().with("tabWidth", "4"),
            &prettier_options(),
        )
        .unwrap();

        let mut backend = MockExecutionBackend::new();
        backend.expect_describe().return_const("mock".to_string());
        backend
            .expect_invoke()
            .withf(|req| {
                req.options.get("tabWidth") == Some(&OptionValue::Int(4))
                    && req.file_path.as_deref() == Some(Path::new("/out/a.jsx"))
            })
            .returning(|req| Ok(format!("{}\n", req.text.trim())));

        let stage = FormatStage::new(Arc::new(backend), Arc::new(options));
        let ctx = StageContext::new("/src/a.cjsx", "/out/a.jsx");
        let outcome = stage.run(PipelineArtifact::new("  <Foo />;  "), &ctx).await;

        assert_eq!(outcome.artifact().unwrap().text(), "<Foo />;\n");
    }
}
