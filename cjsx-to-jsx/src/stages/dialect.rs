use super::{delegate, request_for, Stage, StageContext};
use crate::core::{PipelineArtifact, StageKind, StageOutcome};
use crate::execution::ExecutionBackend;
use crate::options::ResolvedOptions;
use async_trait::async_trait;
use std::sync::Arc;

/// Converts CoffeeScript to JavaScript.
///
/// The resolved decaffeinate options are forwarded unmodified. Failures are
/// not retried.
#[derive(Debug, Clone)]
pub struct DialectConvertStage {
    backend: Arc<dyn ExecutionBackend>,
    options: Arc<ResolvedOptions>,
}

impl DialectConvertStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>, options: Arc<ResolvedOptions>) -> Self {
        Self { backend, options }
    }

    /// Returns the options this stage forwards.
    #[must_use]
    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }
}

#[async_trait]
impl Stage for DialectConvertStage {
    fn kind(&self) -> StageKind {
        StageKind::DialectConvert
    }

    async fn run(&self, artifact: PipelineArtifact, ctx: &StageContext) -> StageOutcome {
        let request = request_for(artifact, &ctx.source_path).with_options(Arc::clone(&self.options));
        delegate(self.kind(), self.backend.as_ref(), request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{BackendError, MockExecutionBackend};
    use crate::options::{decaffeinate_options, translate, FlatConfig, OptionValue};

    #[tokio::test]
    async fn test_dialect_forwards_renamed_options() {
        let options = translate(
            &FlatConfig::new().with("useJsModules", true),
            &decaffeinate_options(),
        )
        .unwrap();

        let mut backend = MockExecutionBackend::new();
        backend.expect_describe().return_const("mock".to_string());
        backend
            .expect_invoke()
            .withf(|req| req.options.get("useJSModules") == Some(&OptionValue::Bool(true)))
            .times(1)
            .returning(|req| Ok(format!("{};", req.text)));

        let stage = DialectConvertStage::new(Arc::new(backend), Arc::new(options));
        let ctx = StageContext::new("/a.cjsx", "/a.jsx");
        let outcome = stage.run(PipelineArtifact::new("x = 1"), &ctx).await;

        assert_eq!(outcome.artifact().unwrap().text(), "x = 1;");
    }

    #[tokio::test]
    async fn test_dialect_failure_is_not_retried() {
        let mut backend = MockExecutionBackend::new();
        backend.expect_describe().return_const("mock".to_string());
        backend
            .expect_invoke()
            .times(1)
            .returning(|_| Err(BackendError::Raised("unexpected indentation".to_string())));

        let stage = DialectConvertStage::new(Arc::new(backend), Arc::new(ResolvedOptions::empty()));
        let ctx = StageContext::new("/a.cjsx", "/a.jsx");
        let outcome = stage.run(PipelineArtifact::new("  x"), &ctx).await;

        let failure = outcome.failure_info().unwrap();
        assert_eq!(failure.label(), "Decaffeinate");
        assert_eq!(failure.message, "unexpected indentation");
    }
}
