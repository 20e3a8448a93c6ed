// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Worker Pool (C5): a handler registry mapping task-type to an async
//! handler, with exponential-backoff retry (§4.4). A `WorkerPool` is
//! shared by every per-streamer queue C7 spins up; each call to
//! [`WorkerPool::execute`] runs one task through to a terminal state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use streamvault_core::{Clock, Payload, QueueTask, QueueTaskStatus};

use crate::error::EngineError;
use crate::progress::{SharedProgressTracker, TaskState};

/// A progress callback a handler calls with `0..=100`.
pub type ProgressFn<'a> = dyn Fn(u8) + Send + Sync + 'a;

#[async_trait]
pub trait TaskHandler: Send + Sync + 'static {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError>;
}

/// Stable dispatch key for a [`Payload`] variant, matching the registry
/// key a handler is registered under.
pub fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::SegmentConcatenation { .. } => "segment_concatenation",
        Payload::MetadataGeneration { .. } => "metadata_generation",
        Payload::Mp4Remux { .. } => "mp4_remux",
        Payload::Mp4Validation { .. } => "mp4_validation",
        Payload::ThumbnailGeneration { .. } => "thumbnail_generation",
        Payload::Cleanup { .. } => "cleanup",
        Payload::OrphanRecoveryCheck { .. } => "orphan_recovery_check",
        Payload::CaptureExternalTask { .. } => "capture_external_task",
    }
}

pub struct WorkerPool<C: Clock> {
    handlers: HashMap<&'static str, Arc<dyn TaskHandler>>,
    tracker: SharedProgressTracker<C>,
    _clock: C,
}

impl<C: Clock> WorkerPool<C> {
    pub fn new(clock: C, tracker: SharedProgressTracker<C>) -> Self {
        Self {
            handlers: HashMap::new(),
            tracker,
            _clock: clock,
        }
    }

    pub fn register(&mut self, task_type: &'static str, handler: Arc<dyn TaskHandler>) {
        self.handlers.insert(task_type, handler);
    }

    /// `delay = min(2^attempt, 60)s` (§4.4).
    pub fn backoff_delay(attempt: u32) -> Duration {
        Duration::from_secs(2u64.saturating_pow(attempt).min(60))
    }

    /// Runs `task` to a terminal state, retrying on [`Severity::Retryable`]
    /// failures up to `task.max_attempts`. `on_complete` is always invoked
    /// exactly once, regardless of outcome, so C6 can unblock dependents
    /// (§4.4: "the pool always notifies the queue-manager completion
    /// callback regardless of outcome").
    pub async fn execute(&self, mut task: QueueTask, on_complete: impl FnOnce(&QueueTask)) -> QueueTask {
        task.status = QueueTaskStatus::Running;
        self.tracker.update_status(&task.id, TaskState::Running, None);

        loop {
            let kind = payload_kind(&task.payload);
            let Some(handler) = self.handlers.get(kind).cloned() else {
                task.status = QueueTaskStatus::Failed;
                task.last_error = Some(format!("no handler registered for {kind}"));
                self.tracker.update_status(&task.id, TaskState::Failed, task.last_error.clone());
                break;
            };

            let tracker = Arc::clone(&self.tracker);
            let id = task.id.clone();
            let progress_cb = move |pct: u8| tracker.update_progress(&id, pct);

            match handler.execute(&task.payload, &progress_cb).await {
                Ok(()) => {
                    task.status = QueueTaskStatus::Completed;
                    task.last_error = None;
                    self.tracker.update_status(&task.id, TaskState::Completed, None);
                    break;
                }
                Err(err) => {
                    task.attempts += 1;
                    task.last_error = Some(err.to_string());
                    let retryable = err.severity().is_retryable();
                    if !retryable || task.attempts >= task.max_attempts {
                        task.status = QueueTaskStatus::Failed;
                        self.tracker.update_status(&task.id, TaskState::Failed, task.last_error.clone());
                        break;
                    }
                    task.status = QueueTaskStatus::Retrying;
                    self.tracker.increment_retry(&task.id);
                    tokio::time::sleep(Self::backoff_delay(task.attempts)).await;
                }
            }
        }

        on_complete(&task);
        task
    }
}

#[cfg(test)]
#[path = "worker_pool_tests.rs"]
mod tests;
