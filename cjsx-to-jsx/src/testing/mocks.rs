//! Test backends.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use crate::execution::{BackendError, ExecutionBackend, TransformFn, TransformRequest};

/// Replays scripted responses in order, then echoes its input.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
}

impl ScriptedBackend {
    /// Creates a backend with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response.
    #[must_use]
    pub fn then_ok(self, text: impl Into<String>) -> Self {
        self.responses.lock().push_back(Ok(text.into()));
        self
    }

    /// Queues a failure.
    #[must_use]
    pub fn then_err(self, message: impl Into<String>) -> Self {
        self.responses.lock().push_back(Err(message.into()));
        self
    }

    /// Returns how many scripted responses are left.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.responses.lock().len()
    }
}

#[async_trait]
impl ExecutionBackend for ScriptedBackend {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn invoke(&self, request: &TransformRequest) -> Result<String, BackendError> {
        let next = self.responses.lock().pop_front();
        match next {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BackendError::Raised(message)),
            None => Ok(request.text.clone()),
        }
    }
}

/// Always fails with the same diagnostic.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    message: String,
}

impl FailingBackend {
    /// Creates a failing backend.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl ExecutionBackend for FailingBackend {
    fn describe(&self) -> String {
        "failing".to_string()
    }

    async fn invoke(&self, _request: &TransformRequest) -> Result<String, BackendError> {
        Err(BackendError::Raised(self.message.clone()))
    }
}

/// Runs a transform and keeps every request it saw.
pub struct RecordingBackend {
    func: Arc<TransformFn>,
    requests: Mutex<Vec<TransformRequest>>,
}

impl RecordingBackend {
    /// Wraps a transform.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&TransformRequest) -> Result<String, String> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns the number of invocations.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<TransformRequest> {
        self.requests.lock().clone()
    }
}

impl fmt::Debug for RecordingBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordingBackend")
            .field("calls", &self.calls())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ExecutionBackend for RecordingBackend {
    fn describe(&self) -> String {
        "recording".to_string()
    }

    async fn invoke(&self, request: &TransformRequest) -> Result<String, BackendError> {
        self.requests.lock().push(request.clone());
        (self.func)(request).map_err(BackendError::Raised)
    }
}
