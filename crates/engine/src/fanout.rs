// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket Fan-Out composer (C11, §4.10, §6): builds the JSON payloads
//! the transport layer (`streamvault_adapters::FanoutTransport`) pushes
//! to every connected peer, and deduplicates periodic snapshots by
//! content hash so an unchanged world never re-sends.

use std::sync::Mutex;

use serde::Serialize;
use sha2::{Digest, Sha256};
use streamvault_adapters::FanoutTransport;
use streamvault_core::{RecordingId, StreamId, StreamerId, TaskId};

use crate::progress::{ProgressEvent, TaskState};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum OutboundMessage {
    #[serde(rename = "task_status_update")]
    TaskStatusUpdate {
        id: TaskId,
        task_type: String,
        status: &'static str,
        progress: u8,
        error_message: Option<String>,
        retry_count: u32,
    },
    #[serde(rename = "task_progress_update")]
    TaskProgressUpdate { task_id: TaskId, progress: u8 },
    #[serde(rename = "queue_stats_update")]
    QueueStatsUpdate {
        queue_size: usize,
        active: usize,
        completed: usize,
        external: usize,
        streamers: Vec<StreamerQueueStats>,
    },
    #[serde(rename = "recording.started")]
    RecordingStarted {
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
    },
    #[serde(rename = "recording.completed")]
    RecordingCompleted {
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        file_path: Option<String>,
        file_size: Option<i64>,
    },
    #[serde(rename = "recording.stopped")]
    RecordingStopped {
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
    },
    #[serde(rename = "recording.failed")]
    RecordingFailed {
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        error_message: String,
    },
    #[serde(rename = "recording.progress")]
    RecordingProgress {
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        progress: u8,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct StreamerQueueStats {
    pub streamer_id: StreamerId,
    pub queue_size: usize,
    pub active_workers: u32,
    pub max_workers: u32,
}

fn task_state_label(state: TaskState) -> &'static str {
    match state {
        TaskState::Pending => "pending",
        TaskState::Running => "running",
        TaskState::Completed => "completed",
        TaskState::Failed => "failed",
    }
}

/// Composes tracker events and periodic snapshots into wire payloads and
/// drives a [`FanoutTransport`]. Per §4.10: status deltas always send;
/// periodic snapshots send only when their content hash changed.
pub struct Fanout<T: FanoutTransport> {
    transport: T,
    last_snapshot_hash: Mutex<Option<[u8; 32]>>,
}

impl<T: FanoutTransport> Fanout<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last_snapshot_hash: Mutex::new(None),
        }
    }

    /// Translate a progress-tracker event (C4) into the matching wire
    /// message and broadcast it unconditionally.
    pub async fn on_progress_event(&self, task_type: &str, event: ProgressEvent) {
        let message = match event {
            ProgressEvent::StatusChanged(task) => OutboundMessage::TaskStatusUpdate {
                id: task.id,
                task_type: task_type.to_string(),
                status: task_state_label(task.state),
                progress: task.progress,
                error_message: task.error_message,
                retry_count: task.retry_count,
            },
            ProgressEvent::ProgressChanged { id, progress } => {
                OutboundMessage::TaskProgressUpdate { task_id: id, progress }
            }
        };
        self.send(&message).await;
    }

    pub async fn recording_started(&self, recording_id: RecordingId, stream_id: StreamId, streamer_id: StreamerId) {
        self.send(&OutboundMessage::RecordingStarted {
            recording_id,
            stream_id,
            streamer_id,
        })
        .await;
    }

    pub async fn recording_completed(
        &self,
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        file_path: Option<String>,
        file_size: Option<i64>,
    ) {
        self.send(&OutboundMessage::RecordingCompleted {
            recording_id,
            stream_id,
            streamer_id,
            file_path,
            file_size,
        })
        .await;
    }

    pub async fn recording_stopped(&self, recording_id: RecordingId, stream_id: StreamId, streamer_id: StreamerId) {
        self.send(&OutboundMessage::RecordingStopped {
            recording_id,
            stream_id,
            streamer_id,
        })
        .await;
    }

    pub async fn recording_failed(
        &self,
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        error_message: String,
    ) {
        self.send(&OutboundMessage::RecordingFailed {
            recording_id,
            stream_id,
            streamer_id,
            error_message,
        })
        .await;
    }

    /// Capture-in-progress sample (§9 Open Question 1: real duration once
    /// parsed, a fixed placeholder beforehand). Unlike the other
    /// `recording.*` events this one is frequent, so callers should only
    /// invoke it from the same throttled cadence as the capture monitor's
    /// poll loop, not on every log line.
    pub async fn recording_progress(
        &self,
        recording_id: RecordingId,
        stream_id: StreamId,
        streamer_id: StreamerId,
        progress: u8,
    ) {
        self.send(&OutboundMessage::RecordingProgress {
            recording_id,
            stream_id,
            streamer_id,
            progress,
        })
        .await;
    }

    /// Periodic (10s) snapshot of queue stats (§4.10, §4.6). Hashed and
    /// sent only if the hash changed since the last call.
    pub async fn broadcast_snapshot(
        &self,
        queue_size: usize,
        active: usize,
        completed: usize,
        external: usize,
        streamers: Vec<StreamerQueueStats>,
    ) {
        let message = OutboundMessage::QueueStatsUpdate {
            queue_size,
            active,
            completed,
            external,
            streamers,
        };
        let Ok(body) = serde_json::to_string(&message) else {
            return;
        };
        let hash: [u8; 32] = Sha256::digest(body.as_bytes()).into();
        {
            let mut last = self.last_snapshot_hash.lock().unwrap_or_else(|e| e.into_inner());
            if *last == Some(hash) {
                return;
            }
            *last = Some(hash);
        }
        self.transport.broadcast(body).await;
    }

    async fn send(&self, message: &OutboundMessage) {
        if let Ok(body) = serde_json::to_string(message) {
            self.transport.broadcast(body).await;
        }
    }

    pub fn connection_count(&self) -> usize {
        self.transport.connection_count()
    }
}

#[cfg(test)]
#[path = "fanout_tests.rs"]
mod tests;
