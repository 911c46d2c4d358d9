//! Where pipeline events go.

use super::PipelineEvent;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt::Debug;
use tracing::debug;

/// Receives lifecycle events from the orchestrator.
///
/// Sinks must not fail the run; `emit` has no error channel.
#[async_trait]
pub trait EventSink: Send + Sync + Debug {
    /// Delivers one event.
    async fn emit(&self, event: &PipelineEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: &PipelineEvent) {}
}

/// Writes each event as a debug-level `tracing` record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingEventSink;

#[async_trait]
impl EventSink for LoggingEventSink {
    async fn emit(&self, event: &PipelineEvent) {
        debug!(
            event = event.name(),
            run_id = %event.run_id(),
            stage = ?event.stage(),
            details = ?event,
            "Pipeline event"
        );
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingEventSink {
    events: Mutex<Vec<PipelineEvent>>,
}

impl CollectingEventSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every event received so far.
    #[must_use]
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().clone()
    }

    /// Returns the events whose name starts with `prefix`.
    #[must_use]
    pub fn events_of_type(&self, prefix: &str) -> Vec<PipelineEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name().starts_with(prefix))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl EventSink for CollectingEventSink {
    async fn emit(&self, event: &PipelineEvent) {
        self.events.lock().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StageKind;
    use uuid::Uuid;

    fn started(stage: StageKind) -> PipelineEvent {
        PipelineEvent::StageStarted {
            run_id: Uuid::nil(),
            stage,
        }
    }

    #[tokio::test]
    async fn test_noop_and_logging_sinks_accept_events() {
        NoOpEventSink.emit(&started(StageKind::MacroStrip)).await;
        LoggingEventSink.emit(&started(StageKind::Format)).await;
    }

    #[tokio::test]
    async fn test_collecting_sink_keeps_order_and_filters() {
        let sink = CollectingEventSink::new();
        sink.emit(&started(StageKind::MacroStrip)).await;
        sink.emit(&PipelineEvent::PipelineCompleted {
            run_id: Uuid::nil(),
            duration_ms: 2.0,
        })
        .await;
        sink.emit(&started(StageKind::DialectConvert)).await;

        let names: Vec<&str> = sink.events().iter().map(PipelineEvent::name).collect();
        assert_eq!(names, vec!["stage.started", "pipeline.completed", "stage.started"]);

        let stages: Vec<_> = sink
            .events_of_type("stage.")
            .iter()
            .filter_map(PipelineEvent::stage)
            .collect();
        assert_eq!(stages, vec![StageKind::MacroStrip, StageKind::DialectConvert]);
    }
}
