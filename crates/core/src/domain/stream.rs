// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `Stream` (§3): one live broadcast (and its eventual recording) of a
//! [`Streamer`](super::Streamer).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{StreamId, StreamerId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub id: StreamId,
    pub streamer_id: StreamerId,
    pub external_stream_id: Option<String>,
    pub title: String,
    pub category_name: Option<String>,
    pub language: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// Per-streamer, per-calendar-month sequence number used in file
    /// paths and NFO episode numbering (§4.7, §9 Open Question).
    pub episode_number: Option<i32>,
    pub recording_path: Option<String>,
}

impl Stream {
    pub fn is_live(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[cfg(test)]
#[path = "stream_tests.rs"]
mod tests;
