// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real [`ProcessSupervisor`] over `tokio::process::Command`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::Mutex as AsyncMutex;

use super::log_rotation::RotatingLogWriter;
use super::{CaptureSpec, ProcessError, ProcessId, ProcessProgress, ProcessRunStatus, ProcessSupervisor};

struct Entry {
    child: Arc<AsyncMutex<Child>>,
    progress: Arc<Mutex<ProcessProgress>>,
}

/// Spawns the configured capture tool (`STREAMVAULT_CAPTURE_BIN`, default
/// `streamlink`) and muxer (`STREAMVAULT_MUXER_BIN`, default `ffmpeg`).
#[derive(Clone)]
pub struct TokioProcessSupervisor {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    log_dir: PathBuf,
    capture_bin: String,
    muxer_bin: String,
}

impl TokioProcessSupervisor {
    pub fn new(log_dir: PathBuf) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            log_dir,
            capture_bin: std::env::var("STREAMVAULT_CAPTURE_BIN").unwrap_or_else(|_| "streamlink".to_string()),
            muxer_bin: std::env::var("STREAMVAULT_MUXER_BIN").unwrap_or_else(|_| "ffmpeg".to_string()),
        }
    }

    fn spawn_tracked(
        &self,
        process_id: ProcessId,
        mut cmd: Command,
        streamer_name: &str,
    ) -> Result<(), ProcessError> {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
        let mut child = cmd
            .spawn()
            .map_err(|e| ProcessError::SpawnFailed(process_id.0.clone(), e.to_string()))?;

        let progress = Arc::new(Mutex::new(ProcessProgress {
            status: ProcessRunStatus::Running,
            duration_seconds: None,
        }));

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let mut writer = RotatingLogWriter::open(&self.log_dir, streamer_name).ok();

        let progress_for_task = Arc::clone(&progress);

        if let Some(out) = stdout {
            let progress = Arc::clone(&progress_for_task);
            tokio::spawn(async move {
                let mut reader = BufReader::new(out).lines();
                while let Ok(Some(line)) = reader.next_line().await {
                    if let Some(writer) = writer.as_mut() {
                        let _ = writer.write_line(&line);
                    }
                    if let Some(secs) = parse_progress_line(&line) {
                        progress.lock().duration_seconds = Some(secs);
                    }
                }
            });
        }
        if let Some(err) = stderr {
            tokio::spawn(async move {
                let mut reader = BufReader::new(err).lines();
                while let Ok(Some(_line)) = reader.next_line().await {
                    // stderr is logged by the stdout task's writer when present;
                    // parse failures here never crash the supervisor (§4.1).
                }
            });
        }

        self.entries.lock().insert(
            process_id.0.clone(),
            Entry {
                child: Arc::new(AsyncMutex::new(child)),
                progress,
            },
        );
        Ok(())
    }
}

/// Parses the documented capture/muxer progress markers — either an
/// ffmpeg-style `time=HH:MM:SS.ms` token or a `Duration: HH:MM:SS` line.
/// Returns `None` (never an error) on anything else, degrading to a
/// heartbeat-only signal per §4.1.
fn parse_progress_line(line: &str) -> Option<f64> {
    for marker in ["time=", "Duration: "] {
        if let Some(idx) = line.find(marker) {
            let rest = &line[idx + marker.len()..];
            let token: String = rest.chars().take_while(|c| c.is_ascii_digit() || *c == ':' || *c == '.').collect();
            if let Some(secs) = parse_hms(&token) {
                return Some(secs);
            }
        }
    }
    None
}

fn parse_hms(token: &str) -> Option<f64> {
    let parts: Vec<&str> = token.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hours: f64 = parts[0].parse().ok()?;
    let minutes: f64 = parts[1].parse().ok()?;
    let seconds: f64 = parts[2].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

#[async_trait]
impl ProcessSupervisor for TokioProcessSupervisor {
    async fn start_capture(&self, spec: CaptureSpec<'_>) -> Result<ProcessId, ProcessError> {
        let process_id = ProcessId::for_stream(spec.stream_id);
        let mut cmd = Command::new(&self.capture_bin);
        cmd.arg("--quality").arg(spec.quality);
        cmd.arg("--codecs").arg(spec.codec_preference.join(","));
        if let Some(proxy) = spec.proxy_url {
            cmd.arg("--http-proxy").arg(proxy);
        }
        cmd.arg("--output").arg(spec.output_path);
        self.spawn_tracked(process_id.clone(), cmd, spec.streamer_name)?;
        Ok(process_id)
    }

    async fn start_remux(&self, process_id: &ProcessId, args: &[String]) -> Result<(), ProcessError> {
        let mut cmd = Command::new(&self.muxer_bin);
        cmd.args(args);
        self.spawn_tracked(process_id.clone(), cmd, &process_id.0)
    }

    async fn terminate(&self, process_id: &ProcessId, grace: Duration) -> Result<bool, ProcessError> {
        let entry = {
            let entries = self.entries.lock();
            entries.get(&process_id.0).map(|e| Arc::clone(&e.child))
        };
        let Some(child) = entry else {
            return Err(ProcessError::NotFound(process_id.0.clone()));
        };

        {
            let mut guard = child.lock().await;
            if let Some(pid) = guard.id() {
                #[cfg(unix)]
                let _ = nix::sys::signal::kill(
                    nix::unistd::Pid::from_raw(pid as i32),
                    nix::sys::signal::Signal::SIGTERM,
                );
            }
        }

        let graceful = tokio::time::timeout(grace, async {
            let mut guard = child.lock().await;
            guard.wait().await
        })
        .await;

        let clean = match graceful {
            Ok(Ok(status)) => status.success(),
            _ => {
                let mut guard = child.lock().await;
                let _ = guard.start_kill();
                let _ = guard.wait().await;
                false
            }
        };

        self.entries.lock().remove(&process_id.0);
        Ok(clean)
    }

    async fn is_active(&self, process_id: &ProcessId) -> bool {
        let entry = {
            let entries = self.entries.lock();
            entries.get(&process_id.0).map(|e| Arc::clone(&e.child))
        };
        let Some(child) = entry else {
            return false;
        };
        let mut guard = child.lock().await;
        matches!(guard.try_wait(), Ok(None))
    }

    async fn progress(&self, process_id: &ProcessId) -> Option<ProcessProgress> {
        let entries = self.entries.lock();
        entries.get(&process_id.0).map(|e| *e.progress.lock())
    }

    async fn wait(&self, process_id: &ProcessId, timeout: Duration) -> Result<ProcessRunStatus, ProcessError> {
        let entry = {
            let entries = self.entries.lock();
            entries.get(&process_id.0).map(|e| Arc::clone(&e.child))
        };
        let Some(child) = entry else {
            return Err(ProcessError::NotFound(process_id.0.clone()));
        };
        let result = tokio::time::timeout(timeout, async {
            let mut guard = child.lock().await;
            guard.wait().await
        })
        .await;
        self.entries.lock().remove(&process_id.0);
        match result {
            Ok(Ok(status)) if status.success() => Ok(ProcessRunStatus::ExitedOk),
            Ok(Ok(_)) => Ok(ProcessRunStatus::ExitedError),
            Ok(Err(e)) => Err(ProcessError::NonZeroExit(process_id.0.clone(), e.to_string())),
            Err(_) => Err(ProcessError::NonZeroExit(process_id.0.clone(), "timed out".to_string())),
        }
    }

    async fn graceful_shutdown(&self, timeout: Duration) {
        let ids: Vec<String> = self.entries.lock().keys().cloned().collect();
        for id in ids {
            let _ = self.terminate(&ProcessId(id), timeout).await;
        }
    }
}

#[cfg(test)]
#[path = "tokio_supervisor_tests.rs"]
mod tests;
