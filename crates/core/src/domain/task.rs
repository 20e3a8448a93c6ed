// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue and dependency task types (§3, §5 REDESIGN FLAG: tagged-union
//! `Payload` in place of an untyped dict).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{RecordingId, StreamId, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Normal,
    High,
    Critical,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueTaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Retrying,
}

/// Tagged-union replacement for the original implementation's untyped
/// task payload dict (§5). Each variant carries exactly the fields its
/// handler needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task_type")]
pub enum Payload {
    SegmentConcatenation { recording_id: RecordingId },
    MetadataGeneration { recording_id: RecordingId },
    Mp4Remux { recording_id: RecordingId },
    Mp4Validation { recording_id: RecordingId },
    ThumbnailGeneration { recording_id: RecordingId },
    Cleanup { recording_id: RecordingId },
    OrphanRecoveryCheck { stream_id: StreamId },
    CaptureExternalTask { stream_id: StreamId, command: String },
}

impl Payload {
    /// The per-streamer queue key a task belongs under (C7: one priority
    /// queue per streamer). Maintenance tasks keyed by `stream_id` still
    /// isolate fan-out per streamer; there is no global catch-all queue.
    pub fn queue_key(&self) -> Option<StreamId> {
        match self {
            Payload::OrphanRecoveryCheck { stream_id } | Payload::CaptureExternalTask { stream_id, .. } => {
                Some(*stream_id)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueTask {
    pub id: TaskId,
    pub payload: Payload,
    pub priority: Priority,
    pub status: QueueTaskStatus,
    pub attempts: u32,
    pub max_attempts: u32,
    pub created_at: DateTime<Utc>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyStatus {
    Pending,
    Ready,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// A node in the per-recording post-processing DAG (§4.6). `depends_on`
/// lists the `TaskId`s that must reach `Completed` before this task can
/// transition `Pending -> Ready`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyTask {
    pub id: TaskId,
    pub payload: Payload,
    pub depends_on: Vec<TaskId>,
    pub status: DependencyStatus,
    pub created_at: DateTime<Utc>,
}

impl DependencyTask {
    /// Ready iff pending and every dependency has completed (§4.6, S5).
    pub fn is_ready(&self, completed: &std::collections::HashSet<TaskId>) -> bool {
        self.status == DependencyStatus::Pending && self.depends_on.iter().all(|d| completed.contains(d))
    }
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
