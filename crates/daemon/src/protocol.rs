// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC request/response types for the operator control socket (§6): a
//! thin Unix-socket mirror of the out-of-scope REST surface, framed by
//! `protocol_wire`. Every read-only query the CLI needs, plus the
//! mutations the spec calls out explicitly (cancel, enqueue, cleanup).

use serde::{Deserialize, Serialize};
use streamvault_core::{RecordingId, StreamId, StreamerId, TaskId};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Request {
    /// Liveness probe: the daemon accepted the connection and can speak
    /// the protocol. Does not touch the database.
    Ping,
    /// Readiness probe: can the daemon reach Postgres right now.
    Health,
    /// Aggregate counts across every in-memory tracked task (§6 stats).
    TaskStats,
    /// Tasks currently `Pending`/`Running` (§6 active).
    ActiveTasks,
    /// Tasks that reached a terminal state within the retention window
    /// (§4.3, §6 recent).
    RecentTasks,
    /// A single task's tracked state, active or completed.
    TaskById { id: TaskId },
    /// Every task queued or running against one streamer's queue.
    StreamTasks { stream_id: StreamId },
    /// Cancels every non-terminal dependency/queue task tied to a
    /// stream's post-processing DAG (§4.6 cancel propagation).
    CancelStream { stream_id: StreamId },
    /// Manually re-seeds the post-processing DAG for one recording —
    /// the same resume path the startup scan uses (§4.9).
    EnqueuePostProcessing { recording_id: RecordingId },
    /// Runs the session/share-token cleanup sweep immediately instead
    /// of waiting for the next periodic tick (§4.11, C12).
    AdminCleanup,
    /// Per-streamer queue depth snapshot (§4.6 stats).
    QueueStats,
    /// Operator-triggered capture of a streamer the poll loop hasn't (yet)
    /// discovered live (§6, §9 `force_start` supplement).
    ForceStart {
        streamer_id: StreamerId,
        title: String,
        category_name: Option<String>,
        language: Option<String>,
        external_stream_id: Option<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum Response {
    Ok(OkPayload),
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OkPayload {
    Pong,
    Health(HealthSummary),
    TaskStats(TaskStatsSummary),
    Tasks(Vec<TrackedTaskEntry>),
    Task(Option<TrackedTaskEntry>),
    Cancelled { cancelled: u64 },
    Enqueued { task_ids: Vec<TaskId> },
    Cleanup { sessions_deleted: u64, tokens_deleted: u64 },
    QueueStats(Vec<StreamerQueueStatsEntry>),
    Started { recording_id: i64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthSummary {
    pub database_reachable: bool,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TaskStatsSummary {
    pub active: usize,
    pub completed: usize,
    pub external: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedTaskEntry {
    pub id: String,
    pub task_type: String,
    pub state: String,
    pub progress: u8,
    pub external: bool,
    pub error_message: Option<String>,
    pub retry_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamerQueueStatsEntry {
    pub stream_id: i64,
    pub pending: i64,
}
