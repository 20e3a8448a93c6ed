// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`ProcessSupervisor`] double, scripted by tests instead of
//! shelling out — same shape as the teacher's `FakeAgentAdapter`/
//! `FakeSessionAdapter`.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{CaptureSpec, ProcessError, ProcessId, ProcessProgress, ProcessRunStatus, ProcessSupervisor};

#[derive(Debug, Clone)]
struct FakeState {
    progress: ProcessProgress,
    active: bool,
}

#[derive(Clone, Default)]
pub struct FakeProcessSupervisor {
    inner: Arc<Mutex<HashMap<String, FakeState>>>,
    terminations: Arc<Mutex<Vec<String>>>,
}

impl FakeProcessSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a process into existence without going through `start_*`,
    /// for tests that want to drive the reaper/monitor directly.
    pub fn seed(&self, process_id: &ProcessId, status: ProcessRunStatus, duration_seconds: Option<f64>) {
        self.inner.lock().insert(
            process_id.0.clone(),
            FakeState {
                progress: ProcessProgress {
                    status,
                    duration_seconds,
                },
                active: status == ProcessRunStatus::Running,
            },
        );
    }

    pub fn set_progress(&self, process_id: &ProcessId, progress: ProcessProgress) {
        if let Some(state) = self.inner.lock().get_mut(&process_id.0) {
            state.progress = progress;
            state.active = progress.status == ProcessRunStatus::Running;
        }
    }

    pub fn terminations(&self) -> Vec<String> {
        self.terminations.lock().clone()
    }
}

#[async_trait]
impl ProcessSupervisor for FakeProcessSupervisor {
    async fn start_capture(&self, spec: CaptureSpec<'_>) -> Result<ProcessId, ProcessError> {
        let process_id = ProcessId::for_stream(spec.stream_id);
        self.seed(&process_id, ProcessRunStatus::Running, Some(0.0));
        Ok(process_id)
    }

    async fn start_remux(&self, process_id: &ProcessId, _args: &[String]) -> Result<(), ProcessError> {
        self.seed(process_id, ProcessRunStatus::Running, Some(0.0));
        Ok(())
    }

    async fn terminate(&self, process_id: &ProcessId, _grace: Duration) -> Result<bool, ProcessError> {
        self.terminations.lock().push(process_id.0.clone());
        let mut inner = self.inner.lock();
        match inner.remove(&process_id.0) {
            Some(_) => Ok(true),
            None => Err(ProcessError::NotFound(process_id.0.clone())),
        }
    }

    async fn is_active(&self, process_id: &ProcessId) -> bool {
        self.inner.lock().get(&process_id.0).map(|s| s.active).unwrap_or(false)
    }

    async fn progress(&self, process_id: &ProcessId) -> Option<ProcessProgress> {
        self.inner.lock().get(&process_id.0).map(|s| s.progress)
    }

    async fn wait(&self, process_id: &ProcessId, _timeout: Duration) -> Result<ProcessRunStatus, ProcessError> {
        let mut inner = self.inner.lock();
        match inner.remove(&process_id.0) {
            Some(state) => Ok(state.progress.status),
            None => Err(ProcessError::NotFound(process_id.0.clone())),
        }
    }

    async fn graceful_shutdown(&self, _timeout: Duration) {
        let ids: Vec<String> = self.inner.lock().keys().cloned().collect();
        for id in ids {
            self.terminations.lock().push(id.clone());
            self.inner.lock().remove(&id);
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
