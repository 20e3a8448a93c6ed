// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `ActiveRecordingState` (§3): the in-flight row tracking a running
//! capture subprocess, one per `stream_id`. This is what the reaper (C10)
//! and capture monitor (C8) read to decide liveness.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ids::{RecordingId, StreamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveRecordingStatus {
    Active,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRecordingState {
    pub stream_id: StreamId,
    pub recording_id: RecordingId,
    pub os_pid: u32,
    /// Opaque identifier correlating this row with the supervised
    /// subprocess's own bookkeeping, independent of `os_pid` reuse.
    pub process_identifier: String,
    pub streamer_name: String,
    pub started_at: DateTime<Utc>,
    pub ts_output_path: String,
    /// Set when the recording was started via `force_start_recording`
    /// (§9 supplement) rather than discovered through the poll loop.
    pub forced: bool,
    pub quality: String,
    pub status: ActiveRecordingStatus,
    pub last_heartbeat: DateTime<Utc>,
    pub config: Value,
}

impl ActiveRecordingState {
    /// Heartbeat staleness check backing P-series recovery properties: a
    /// row with no heartbeat inside `grace` is considered orphaned.
    pub fn is_stale(&self, now: DateTime<Utc>, grace: chrono::Duration) -> bool {
        now.signed_duration_since(self.last_heartbeat) > grace
    }
}

#[cfg(test)]
#[path = "active_recording_state_tests.rs"]
mod tests;
