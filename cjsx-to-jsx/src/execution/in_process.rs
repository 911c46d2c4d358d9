use super::{BackendError, ExecutionBackend, TransformRequest};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Signature of an in-process transformer.
pub type TransformFn = dyn Fn(&TransformRequest) -> Result<String, String> + Send + Sync;

/// Calls a Rust function instead of spawning a program.
#[derive(Clone)]
pub struct InProcessBackend {
    name: String,
    func: Arc<TransformFn>,
}

impl InProcessBackend {
    /// Wraps a transformer function.
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&TransformRequest) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    /// Returns the backend name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for InProcessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InProcessBackend")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ExecutionBackend for InProcessBackend {
    fn describe(&self) -> String {
        format!("in-process:{}", self.name)
    }

    async fn invoke(&self, request: &TransformRequest) -> Result<String, BackendError> {
        (self.func)(request).map_err(BackendError::Raised)
    }
}
