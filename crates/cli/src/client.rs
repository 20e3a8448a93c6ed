// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::client_lifecycle::log_connection_error;
use crate::daemon_process::{
    cleanup_stale_socket, daemon_socket, probe_socket, read_startup_error, start_daemon_background,
    wrap_with_startup_error,
};

use streamvault_core::{RecordingId, StreamId, StreamerId, TaskId};
use streamvault_daemon::protocol_wire::{self, ProtocolError};
use streamvault_daemon::{
    HealthSummary, OkPayload, Request, Response, StreamerQueueStatsEntry, TaskStatsSummary, TrackedTaskEntry,
};
use thiserror::Error;
use tokio::net::UnixStream;

// Timeout configuration (env vars in milliseconds)
fn parse_duration_ms(var: &str) -> Option<Duration> {
    std::env::var(var).ok().and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Timeout for IPC requests.
pub fn timeout_ipc() -> Duration {
    parse_duration_ms("STREAMVAULT_TIMEOUT_IPC_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for daemon to start.
pub fn timeout_connect() -> Duration {
    parse_duration_ms("STREAMVAULT_TIMEOUT_CONNECT_MS").unwrap_or(Duration::from_secs(5))
}

/// Timeout for waiting for process to exit.
pub fn timeout_exit() -> Duration {
    parse_duration_ms("STREAMVAULT_TIMEOUT_EXIT_MS").unwrap_or(Duration::from_secs(2))
}

/// Polling interval for connection retries.
pub fn poll_interval() -> Duration {
    parse_duration_ms("STREAMVAULT_CONNECT_POLL_MS").unwrap_or(Duration::from_millis(50))
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("daemon not running")]
    DaemonNotRunning,

    #[error("failed to start daemon: {0}")]
    DaemonStartFailed(String),

    #[error("connection timeout waiting for daemon to start")]
    DaemonStartTimeout,

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("request rejected: {0}")]
    Rejected(String),

    #[error("unexpected response from daemon")]
    UnexpectedResponse,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not determine state directory")]
    NoStateDir,
}

/// Daemon client: a thin wrapper over the length-prefixed JSON Unix socket
/// protocol the `streamvaultd` control loop serves.
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// For action commands (force-start, cancel-stream, enqueue, cleanup):
    /// auto-starts the daemon if it's not already running.
    pub fn for_action() -> Result<Self, ClientError> {
        Self::connect_or_start()
    }

    /// For query commands: connect only, never auto-start. A query against a
    /// daemon that isn't running has nothing useful to report anyway.
    pub fn for_query() -> Result<Self, ClientError> {
        Self::connect()
    }

    /// Connect to daemon, auto-starting it in the background if not running.
    pub fn connect_or_start() -> Result<Self, ClientError> {
        match Self::connect() {
            Ok(client) => {
                // Socket file present but daemon may have crashed, leaving it stale.
                if probe_socket(&client.socket_path) {
                    Ok(client)
                } else {
                    cleanup_stale_socket()?;
                    let child = start_daemon_background()?;
                    Self::connect_with_retry(timeout_connect(), child)
                }
            }
            Err(ClientError::DaemonNotRunning) => {
                let child = start_daemon_background()?;
                Self::connect_with_retry(timeout_connect(), child)
            }
            Err(e) => Err(wrap_with_startup_error(e)),
        }
    }

    /// Connect to an existing daemon (no auto-start).
    pub fn connect() -> Result<Self, ClientError> {
        let socket_path = daemon_socket()?;

        if !socket_path.exists() {
            let err = ClientError::DaemonNotRunning;
            log_connection_error(&err);
            return Err(err);
        }

        Ok(Self { socket_path })
    }

    fn connect_with_retry(timeout: Duration, mut child: std::process::Child) -> Result<Self, ClientError> {
        let start = Instant::now();
        while start.elapsed() < timeout {
            match child.try_wait() {
                Ok(Some(status)) => {
                    let poll_start = Instant::now();
                    while poll_start.elapsed() < timeout_exit() {
                        if let Some(err) = read_startup_error() {
                            return Err(ClientError::DaemonStartFailed(err));
                        }
                        std::thread::sleep(poll_interval());
                    }
                    return Err(ClientError::DaemonStartFailed(format!("exited with {status}")));
                }
                Ok(None) => {}
                Err(_) => {}
            }

            match Self::connect() {
                Ok(client) => return Ok(client),
                Err(ClientError::DaemonNotRunning) => std::thread::sleep(poll_interval()),
                Err(e) => return Err(wrap_with_startup_error(e)),
            }
        }

        Err(wrap_with_startup_error(ClientError::DaemonStartTimeout))
    }

    async fn send_with_timeout(
        &self,
        request: &Request,
        read_timeout: Duration,
        write_timeout: Duration,
    ) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let data = protocol_wire::encode(request)?;
        tokio::time::timeout(write_timeout, protocol_wire::write_message(&mut writer, &data))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        let response_bytes = tokio::time::timeout(read_timeout, protocol_wire::read_message(&mut reader))
            .await
            .map_err(|_| ProtocolError::Timeout)??;

        Ok(protocol_wire::decode(&response_bytes)?)
    }

    /// Send a request and receive a response.
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        match self.send_with_timeout(request, timeout_ipc(), timeout_ipc()).await {
            Ok(response) => Ok(response),
            Err(e) => {
                log_connection_error(&e);
                Err(e)
            }
        }
    }

    async fn send_ok(&self, request: &Request) -> Result<OkPayload, ClientError> {
        match self.send(request).await? {
            Response::Ok(payload) => Ok(payload),
            Response::Error { message } => Err(ClientError::Rejected(message)),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send_ok(&Request::Ping).await? {
            OkPayload::Pong => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn health(&self) -> Result<HealthSummary, ClientError> {
        match self.send_ok(&Request::Health).await? {
            OkPayload::Health(summary) => Ok(summary),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn task_stats(&self) -> Result<TaskStatsSummary, ClientError> {
        match self.send_ok(&Request::TaskStats).await? {
            OkPayload::TaskStats(stats) => Ok(stats),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn active_tasks(&self) -> Result<Vec<TrackedTaskEntry>, ClientError> {
        match self.send_ok(&Request::ActiveTasks).await? {
            OkPayload::Tasks(tasks) => Ok(tasks),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn recent_tasks(&self) -> Result<Vec<TrackedTaskEntry>, ClientError> {
        match self.send_ok(&Request::RecentTasks).await? {
            OkPayload::Tasks(tasks) => Ok(tasks),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn task_by_id(&self, id: TaskId) -> Result<Option<TrackedTaskEntry>, ClientError> {
        match self.send_ok(&Request::TaskById { id }).await? {
            OkPayload::Task(task) => Ok(task),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn stream_tasks(&self, stream_id: StreamId) -> Result<Vec<TrackedTaskEntry>, ClientError> {
        match self.send_ok(&Request::StreamTasks { stream_id }).await? {
            OkPayload::Tasks(tasks) => Ok(tasks),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn cancel_stream(&self, stream_id: StreamId) -> Result<u64, ClientError> {
        match self.send_ok(&Request::CancelStream { stream_id }).await? {
            OkPayload::Cancelled { cancelled } => Ok(cancelled),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn enqueue_post_processing(&self, recording_id: RecordingId) -> Result<Vec<TaskId>, ClientError> {
        match self.send_ok(&Request::EnqueuePostProcessing { recording_id }).await? {
            OkPayload::Enqueued { task_ids } => Ok(task_ids),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn admin_cleanup(&self) -> Result<(u64, u64), ClientError> {
        match self.send_ok(&Request::AdminCleanup).await? {
            OkPayload::Cleanup {
                sessions_deleted,
                tokens_deleted,
            } => Ok((sessions_deleted, tokens_deleted)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    pub async fn queue_stats(&self) -> Result<Vec<StreamerQueueStatsEntry>, ClientError> {
        match self.send_ok(&Request::QueueStats).await? {
            OkPayload::QueueStats(stats) => Ok(stats),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn force_start(
        &self,
        streamer_id: StreamerId,
        title: String,
        category_name: Option<String>,
        language: Option<String>,
        external_stream_id: Option<String>,
    ) -> Result<i64, ClientError> {
        let request = Request::ForceStart {
            streamer_id,
            title,
            category_name,
            language,
            external_stream_id,
        };
        match self.send_ok(&request).await? {
            OkPayload::Started { recording_id } => Ok(recording_id),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
