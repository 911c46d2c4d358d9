//! Per-stage execution records.

use super::{StageKind, StageStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What happened when the orchestrator reached a stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageRecord {
    /// The stage.
    pub stage: StageKind,
    /// How it ended.
    pub status: StageStatus,
    /// When the stage started.
    pub started_at: DateTime<Utc>,
    /// When the stage ended.
    pub ended_at: DateTime<Utc>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: f64,
    /// Diagnostic text if the stage failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageRecord {
    /// Creates a completed record.
    #[must_use]
    pub fn completed(stage: StageKind, started_at: DateTime<Utc>, duration_ms: f64) -> Self {
        Self {
            stage,
            status: StageStatus::Ok,
            started_at,
            ended_at: Utc::now(),
            duration_ms,
            error: None,
        }
    }

    /// Creates a failed record.
    #[must_use]
    pub fn failed(
        stage: StageKind,
        started_at: DateTime<Utc>,
        duration_ms: f64,
        error: impl Into<String>,
    ) -> Self {
        Self {
            stage,
            status: StageStatus::Fail,
            started_at,
            ended_at: Utc::now(),
            duration_ms,
            error: Some(error.into()),
        }
    }

    /// Creates a record for a bypassed stage.
    #[must_use]
    pub fn skipped(stage: StageKind) -> Self {
        let now = Utc::now();
        Self {
            stage,
            status: StageStatus::Skip,
            started_at: now,
            ended_at: now,
            duration_ms: 0.0,
            error: None,
        }
    }
}
