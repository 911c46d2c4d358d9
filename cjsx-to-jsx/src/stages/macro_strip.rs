use super::{delegate, request_for, Stage, StageContext};
use crate::core::{PipelineArtifact, StageKind, StageOutcome};
use crate::execution::ExecutionBackend;
use async_trait::async_trait;
use std::sync::Arc;

/// Expands CJSX element macros into element-construction calls.
///
/// Forwards no options; the transformer sees the source path.
#[derive(Debug, Clone)]
pub struct MacroStripStage {
    backend: Arc<dyn ExecutionBackend>,
}

impl MacroStripStage {
    /// Creates the stage.
    #[must_use]
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Stage for MacroStripStage {
    fn kind(&self) -> StageKind {
        StageKind::MacroStrip
    }

    async fn run(&self, artifact: PipelineArtifact, ctx: &StageContext) -> StageOutcome {
        let request = request_for(artifact, &ctx.source_path);
        delegate(self.kind(), self.backend.as_ref(), request).await
    }
}
