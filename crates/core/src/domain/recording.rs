// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Recording` (§3): the durable row tracking one capture-through-archive
//! lifecycle for a [`Stream`](super::Stream).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{RecordingId, StreamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordingStatus {
    Recording,
    Processing,
    Completed,
    Stopped,
    Failed,
}

impl RecordingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RecordingStatus::Completed | RecordingStatus::Stopped | RecordingStatus::Failed
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub id: RecordingId,
    pub stream_id: StreamId,
    pub path: String,
    pub status: RecordingStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i64>,
    pub file_size_bytes: Option<i64>,
    pub error_message: Option<String>,
    /// Stable machine tag (§7 `FailureReason::tag`), distinct from the
    /// free-form `error_message`.
    pub failure_reason: Option<String>,
    pub error_at: Option<DateTime<Utc>>,
}

impl Recording {
    pub fn mark_failed(&mut self, tag: impl Into<String>, message: impl Into<String>, now: DateTime<Utc>) {
        self.status = RecordingStatus::Failed;
        self.failure_reason = Some(tag.into());
        self.error_message = Some(message.into());
        self.error_at = Some(now);
        self.end_time.get_or_insert(now);
    }
}

#[cfg(test)]
#[path = "recording_tests.rs"]
mod tests;
