// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `RecordingProcessingState` (§3, §4.9): per-recording status of each
//! fixed post-processing step. Distinct from [`super::task::QueueTaskStatus`]
//! (a single queued unit of work) and `DependencyStatus` (a DAG node) —
//! this is the durable idempotency gate the handlers re-read before
//! doing any work (§4.9 "idempotency gate").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::RecordingId;

/// The six fixed post-processing steps run per recording (§4.9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepName {
    Metadata,
    Chapters,
    Mp4Remux,
    Mp4Validation,
    Thumbnail,
    Cleanup,
}

impl StepName {
    pub const ALL: [StepName; 6] = [
        StepName::Metadata,
        StepName::Chapters,
        StepName::Mp4Remux,
        StepName::Mp4Validation,
        StepName::Thumbnail,
        StepName::Cleanup,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcessingStepStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Skipped,
}

/// One row per `(recording_id, step)`. A handler reads this before doing
/// any work and returns early if `status == Completed` (idempotency gate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingProcessingState {
    pub recording_id: RecordingId,
    pub step: StepName,
    pub status: ProcessingStepStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl RecordingProcessingState {
    pub fn pending(recording_id: RecordingId, step: StepName, now: DateTime<Utc>) -> Self {
        Self {
            recording_id,
            step,
            status: ProcessingStepStatus::Pending,
            attempts: 0,
            last_error: None,
            updated_at: now,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(
            self.status,
            ProcessingStepStatus::Completed | ProcessingStepStatus::Skipped
        )
    }
}

#[cfg(test)]
#[path = "processing_state_tests.rs"]
mod tests;
