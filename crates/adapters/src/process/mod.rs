// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process Supervisor (C2): spawns and supervises the two kinds of child
//! processes the core shells out to — the stream-capture tool and the
//! bitstream muxer — and exposes a small trait the engine drives without
//! caring whether a real subprocess or a test double is underneath.

mod fake;
mod log_rotation;
mod tokio_supervisor;

pub use fake::FakeProcessSupervisor;
pub use log_rotation::RotatingLogWriter;
pub use tokio_supervisor::TokioProcessSupervisor;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Opaque handle correlating a supervised child with its caller. Always
/// `stream_<streamID>` per §4.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProcessId(pub String);

impl ProcessId {
    pub fn for_stream(stream_id: i64) -> Self {
        Self(format!("stream_{stream_id}"))
    }
}

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessRunStatus {
    Running,
    ExitedOk,
    ExitedError,
}

/// Progress inferred from a child's output (§4.1: "progress is inferred
/// from child log lines"). `duration_seconds` is `None` until at least one
/// line matching the documented progress marker has been parsed; a parse
/// failure degrades to a heartbeat-only signal rather than an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessProgress {
    pub status: ProcessRunStatus,
    pub duration_seconds: Option<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct CaptureSpec<'a> {
    pub stream_id: i64,
    pub output_path: &'a str,
    pub quality: &'a str,
    pub codec_preference: &'a [&'a str],
    pub proxy_url: Option<&'a str>,
    pub streamer_name: &'a str,
}

#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {0}: {1}")]
    SpawnFailed(String, String),
    #[error("process {0} is not tracked")]
    NotFound(String),
    #[error("process {0} did not exit cleanly: {1}")]
    NonZeroExit(String, String),
}

/// Trait implemented by a real supervisor (over `tokio::process::Command`)
/// and, for tests, [`FakeProcessSupervisor`] — the same shape as the
/// teacher's `SessionAdapter`/`AgentAdapter` pair.
#[async_trait]
pub trait ProcessSupervisor: Clone + Send + Sync + 'static {
    /// Start a capture child; returns immediately once spawned (§4.1).
    async fn start_capture(&self, spec: CaptureSpec<'_>) -> Result<ProcessId, ProcessError>;

    /// Start a remux child (muxer invoked per §4.8's concat/remux
    /// invocation contracts). `args` are the muxer's full argument list;
    /// the caller (a C9 handler) builds them.
    async fn start_remux(&self, process_id: &ProcessId, args: &[String]) -> Result<(), ProcessError>;

    /// Two-step escalation: graceful signal, wait up to `grace`, force-kill.
    async fn terminate(&self, process_id: &ProcessId, grace: Duration) -> Result<bool, ProcessError>;

    async fn is_active(&self, process_id: &ProcessId) -> bool;

    async fn progress(&self, process_id: &ProcessId) -> Option<ProcessProgress>;

    /// Wait (with `timeout`) for the process to finish, for handlers that
    /// need a blocking wait on a remux/concat child rather than polling.
    async fn wait(&self, process_id: &ProcessId, timeout: Duration) -> Result<ProcessRunStatus, ProcessError>;

    /// Terminate every tracked process with the same timeout (§5
    /// graceful_shutdown).
    async fn graceful_shutdown(&self, timeout: Duration);
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
