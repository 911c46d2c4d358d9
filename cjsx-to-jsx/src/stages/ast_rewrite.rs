use super::{delegate, request_for, Stage, StageContext};
use crate::core::{PipelineArtifact, StageKind, StageOutcome};
use crate::execution::ExecutionBackend;
use async_trait::async_trait;
use std::sync::Arc;

/// Rewrites element-construction calls into JSX syntax. Never skipped.
#[derive(Debug, Clone)]
pub struct AstRewriteStage {
    backend: Arc<dyn ExecutionBackend>,
}

impl AstRewriteStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Stage for AstRewriteStage {
    fn kind(&self) -> StageKind {
        StageKind::AstRewrite
    }

    async fn run(&self, artifact: PipelineArtifact, ctx: &StageContext) -> StageOutcome {
        let request = request_for(artifact, &ctx.output_path);
        delegate(self.kind(), self.backend.as_ref(), request).await
    }
}
