//! Stage trait and the four transformer adapters.
//!
//! An adapter knows which stage it is, which options it forwards, and which
//! file path its transformer should see. Everything else is delegated to an
//! [`ExecutionBackend`](crate::execution::ExecutionBackend).

mod ast_rewrite;
mod dialect;
mod format;
mod macro_strip;

pub use ast_rewrite::AstRewriteStage;
pub use dialect::DialectConvertStage;
pub use format::FormatStage;
pub use macro_strip::MacroStripStage;

use crate::core::{PipelineArtifact, StageKind, StageOutcome};
use crate::errors::StageFailure;
use crate::execution::{ExecutionBackend, TransformRequest};
use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Per-run facts every stage may read.
#[derive(Debug, Clone)]
pub struct StageContext {
    /// Identifies the run in events and logs.
    pub run_id: Uuid,
    /// Absolute path of the file being converted.
    pub source_path: PathBuf,
    /// Where the converted file will be written.
    pub output_path: PathBuf,
}

impl StageContext {
    /// Creates a context with a fresh run id.
    #[must_use]
    pub fn new(source_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source_path: source_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Sets the run id.
    #[must_use]
    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }
}

/// Trait for pipeline stages.
///
/// A stage takes ownership of the incoming artifact and either produces
/// the next one or fails.
#[async_trait]
pub trait Stage: Send + Sync + Debug {
    /// Returns which stage this is.
    fn kind(&self) -> StageKind;

    /// Transforms the artifact.
    async fn run(&self, artifact: PipelineArtifact, ctx: &StageContext) -> StageOutcome;
}

/// Sends `request` through `backend` and labels any failure with `kind`.
pub(crate) async fn delegate(
    kind: StageKind,
    backend: &dyn ExecutionBackend,
    request: TransformRequest,
) -> StageOutcome {
    debug!(
        stage = %kind,
        backend = %backend.describe(),
        bytes = request.text.len(),
        options = %serde_json::Value::Object(request.options.to_record()),
        "Running stage"
    );
    backend
        .invoke(&request)
        .await
        .map(PipelineArtifact::new)
        .map_err(|err| StageFailure::new(kind, err.diagnostic()))
        .into()
}

pub(crate) fn request_for(artifact: PipelineArtifact, file_path: &Path) -> TransformRequest {
    TransformRequest::new(artifact.into_text()).with_file_path(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::{BackendError, MockExecutionBackend};

    #[tokio::test]
    async fn test_delegate_maps_backend_error_to_labeled_failure() {
        let mut backend = MockExecutionBackend::new();
        backend.expect_describe().return_const("mock".to_string());
        backend.expect_invoke().returning(|_| {
            Err(BackendError::Exited {
                program: "babel".to_string(),
                code: Some(1),
                stderr: "SyntaxError: Unexpected token (3:7)\n".to_string(),
            })
        });

        let outcome = delegate(StageKind::AstRewrite, &backend, TransformRequest::new("x")).await;
        let failure = outcome.failure_info().unwrap();

        assert_eq!(failure.stage, StageKind::AstRewrite);
        assert_eq!(failure.label(), "Babel");
        assert_eq!(failure.message, "SyntaxError: Unexpected token (3:7)");
    }

    #[test]
    fn test_context_run_id() {
        let run_id = Uuid::new_v4();
        let ctx = StageContext::new("/a.cjsx", "/a.jsx").with_run_id(run_id);
        assert_eq!(ctx.run_id, run_id);
        assert_eq!(ctx.output_path, PathBuf::from("/a.jsx"));
    }
}
