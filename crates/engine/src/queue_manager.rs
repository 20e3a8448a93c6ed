// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task Queue Manager (C7): per-streamer priority queues backed by
//! Postgres, M workers draining each one via the [`WorkerPool`] (C5),
//! and the glue that promotes DAG-ready tasks (C6) into those queues and
//! reports completions back to the DAG.
//!
//! One streamer queue is a `tokio::spawn`ed group of
//! [`QueueManagerConfig::workers_per_streamer`] loops, all polling
//! [`streamvault_storage::QueueTaskRepo::claim_next`] for the same
//! `queue_key`. A single process-wide [`tokio::sync::Semaphore`] caps how
//! many streamer groups may be active at once (I4); a second one rate
//! limits in-flight maintenance tasks (§4.6 "no more than 3 orphan
//! recovery checks in flight").

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use streamvault_core::{Clock, Payload, Priority, QueueTask, QueueTaskStatus, RecordingId, StreamId, StreamerId, TaskId};
use streamvault_storage::{DependencyTaskRepo, Gateway, QueueTaskRepo, RecordingRepo};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

use crate::dependency::{DagNode, DependencyManager};
use crate::error::EngineError;
use crate::handlers::recording_id_of;
use crate::progress::SharedProgressTracker;
use crate::worker_pool::{payload_kind, WorkerPool};

#[derive(Debug, Clone)]
pub struct QueueManagerConfig {
    /// Workers draining a single streamer's queue concurrently (§4.6
    /// default: M=4).
    pub workers_per_streamer: u32,
    /// Streamers with an active worker group at once (I4 default: 15).
    pub max_concurrent_streamers: usize,
    /// In-flight `OrphanRecoveryCheck` tasks across every streamer (§4.6
    /// default: 3).
    pub max_concurrent_orphan_checks: usize,
    /// How long an idle worker sleeps before re-polling its queue.
    pub poll_interval: Duration,
}

impl Default for QueueManagerConfig {
    fn default() -> Self {
        Self {
            workers_per_streamer: 4,
            max_concurrent_streamers: 15,
            max_concurrent_orphan_checks: 3,
            poll_interval: Duration::from_secs(2),
        }
    }
}

/// A running streamer worker group. Dropping it does not stop the
/// workers; call [`Self::request_shutdown`] and then [`Self::join`].
pub struct StreamerWorkerGroup {
    pub queue_key: StreamId,
    handles: Vec<JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    _streamer_permit: OwnedSemaphorePermit,
}

impl StreamerWorkerGroup {
    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub async fn join(self) {
        for handle in self.handles {
            let _ = handle.await;
        }
    }
}

pub struct TaskQueueManager<C: Clock> {
    gateway: Gateway,
    worker_pool: Arc<WorkerPool<C>>,
    tracker: SharedProgressTracker<C>,
    dependency: Mutex<DependencyManager>,
    config: QueueManagerConfig,
    clock: C,
    streamer_semaphore: Arc<Semaphore>,
    orphan_semaphore: Arc<Semaphore>,
    active: Mutex<HashMap<StreamId, StreamerId>>,
}

impl<C: Clock> TaskQueueManager<C> {
    pub fn new(
        gateway: Gateway,
        worker_pool: Arc<WorkerPool<C>>,
        tracker: SharedProgressTracker<C>,
        clock: C,
        config: QueueManagerConfig,
    ) -> Self {
        let streamer_semaphore = Arc::new(Semaphore::new(config.max_concurrent_streamers));
        let orphan_semaphore = Arc::new(Semaphore::new(config.max_concurrent_orphan_checks));
        Self {
            gateway,
            worker_pool,
            tracker,
            dependency: Mutex::new(DependencyManager::new()),
            config,
            clock,
            streamer_semaphore,
            orphan_semaphore,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a DAG node (C6). Typically called once per
    /// post-processing step when a recording finishes, before any of its
    /// steps can be promoted into a queue.
    pub fn seed_dependency_task(&self, node: DagNode) -> Result<(), EngineError> {
        self.dependency.lock().add_task(node).map_err(EngineError::InvalidDag)
    }

    /// Resolves the per-streamer queue a payload belongs to. Maintenance
    /// payloads carry their own `stream_id`; post-processing payloads
    /// only carry a `recording_id`, so the owning stream is looked up.
    async fn resolve_queue_key(&self, payload: &Payload) -> Result<StreamId, EngineError> {
        if let Some(key) = payload.queue_key() {
            return Ok(key);
        }
        let recording_id: RecordingId = recording_id_of(payload)?;
        let recording = RecordingRepo::new(&self.gateway).get(recording_id).await?;
        Ok(recording.stream_id)
    }

    /// Promotes every currently-ready DAG node into its streamer's queue
    /// (C6 -> C7 handoff, §4.6). Returns the `TaskId`s promoted.
    pub async fn promote_ready(&self) -> Result<Vec<TaskId>, EngineError> {
        let ready_ids = self.dependency.lock().get_ready_tasks();
        let mut promoted = Vec::with_capacity(ready_ids.len());
        for id in ready_ids {
            let node = {
                let dep = self.dependency.lock();
                dep.get(&id).cloned()
            };
            let Some(node) = node else { continue };
            let queue_key = self.resolve_queue_key(&node.task.payload).await?;
            let task = QueueTask {
                id: node.task.id.clone(),
                payload: node.task.payload.clone(),
                priority: node.priority,
                status: QueueTaskStatus::Pending,
                attempts: 0,
                max_attempts: node.max_attempts,
                created_at: node.task.created_at,
                last_error: None,
            };
            QueueTaskRepo::new(&self.gateway).enqueue(&task, queue_key).await?;
            self.tracker.add(task.id.clone(), payload_kind(&task.payload), false);
            promoted.push(task.id);
        }
        Ok(promoted)
    }

    /// Enqueues a maintenance task (orphan-recovery check, external
    /// capture) directly, bypassing the DAG — these have no dependencies.
    pub async fn enqueue_maintenance(&self, payload: Payload, priority: Priority) -> Result<TaskId, EngineError> {
        let queue_key = payload.queue_key().ok_or_else(|| {
            EngineError::InvalidDag("enqueue_maintenance called with a post-processing payload".to_string())
        })?;
        let task = QueueTask {
            id: TaskId::generate(),
            payload,
            priority,
            status: QueueTaskStatus::Pending,
            attempts: 0,
            max_attempts: 3,
            created_at: self.clock.now_utc(),
            last_error: None,
        };
        QueueTaskRepo::new(&self.gateway).enqueue(&task, queue_key).await?;
        self.tracker.add(task.id.clone(), payload_kind(&task.payload), false);
        Ok(task.id)
    }

    /// Starts draining `queue_key`'s queue with `workers_per_streamer`
    /// workers. Fails with [`EngineError::CapacityExceeded`] if the
    /// process-wide concurrent-streamer cap (I4) is already full.
    pub fn spawn_streamer_workers(
        self: &Arc<Self>,
        queue_key: StreamId,
        streamer_id: StreamerId,
    ) -> Result<StreamerWorkerGroup, EngineError> {
        let permit = Arc::clone(&self.streamer_semaphore).try_acquire_owned().map_err(|_| {
            EngineError::CapacityExceeded(format!(
                "max_concurrent_streamers ({}) reached",
                self.config.max_concurrent_streamers
            ))
        })?;
        self.active.lock().insert(queue_key, streamer_id);

        let shutdown = Arc::new(AtomicBool::new(false));
        let handles = (0..self.config.workers_per_streamer)
            .map(|_| {
                let this = Arc::clone(self);
                let shutdown = Arc::clone(&shutdown);
                tokio::spawn(async move { this.worker_loop(queue_key, shutdown).await })
            })
            .collect();

        Ok(StreamerWorkerGroup {
            queue_key,
            handles,
            shutdown,
            _streamer_permit: permit,
        })
    }

    async fn worker_loop(&self, queue_key: StreamId, shutdown: Arc<AtomicBool>) {
        while !shutdown.load(Ordering::SeqCst) {
            match self.claim_and_run(queue_key).await {
                Ok(true) => continue,
                Ok(false) => tokio::time::sleep(self.config.poll_interval).await,
                Err(_) => tokio::time::sleep(self.config.poll_interval).await,
            }
        }
        self.active.lock().remove(&queue_key);
    }

    /// Claims and runs at most one task. Returns `Ok(true)` if a task was
    /// found and run (so the caller should poll again immediately).
    async fn claim_and_run(&self, queue_key: StreamId) -> Result<bool, EngineError> {
        let repo = QueueTaskRepo::new(&self.gateway);
        let Some(task) = repo.claim_next(queue_key).await? else {
            return Ok(false);
        };

        let is_orphan_check = matches!(task.payload, Payload::OrphanRecoveryCheck { .. });
        let _orphan_permit = if is_orphan_check {
            match Arc::clone(&self.orphan_semaphore).try_acquire_owned() {
                Ok(permit) => Some(permit),
                Err(_) => {
                    // Rate limit hit: put the task back for another worker
                    // (possibly on a different streamer) to pick up later.
                    let mut requeued = task;
                    requeued.status = QueueTaskStatus::Pending;
                    repo.update_status(&requeued).await?;
                    tokio::time::sleep(self.config.poll_interval).await;
                    return Ok(false);
                }
            }
        } else {
            None
        };

        self.run_one(task).await?;
        Ok(true)
    }

    async fn run_one(&self, task: QueueTask) -> Result<(), EngineError> {
        let id = task.id.clone();
        self.dependency.lock().mark_running(&id);
        DependencyTaskRepo::new(&self.gateway)
            .update_status(&id, streamvault_core::DependencyStatus::Running)
            .await
            .ok();

        let finished = self.worker_pool.execute(task, |_| {}).await;
        QueueTaskRepo::new(&self.gateway).update_status(&finished).await?;

        let (effect, dep_status) = match finished.status {
            QueueTaskStatus::Completed => (
                self.dependency.lock().mark_completed(&id),
                Some(streamvault_core::DependencyStatus::Completed),
            ),
            QueueTaskStatus::Failed => {
                // The worker pool already retried internally up to the
                // task's own max_attempts before returning this terminal
                // status, so the DAG node's retries are exhausted too.
                let error = finished.last_error.clone().unwrap_or_default();
                (
                    self.dependency.lock().mark_failed(&id, error, true),
                    Some(streamvault_core::DependencyStatus::Failed),
                )
            }
            _ => (Default::default(), None),
        };
        if let Some(status) = dep_status {
            DependencyTaskRepo::new(&self.gateway).update_status(&id, status).await.ok();
        }

        for failed_id in &effect.newly_failed {
            DependencyTaskRepo::new(&self.gateway)
                .update_status(failed_id, streamvault_core::DependencyStatus::Failed)
                .await
                .ok();
        }

        if !effect.newly_ready.is_empty() {
            self.promote_ready().await?;
        }
        Ok(())
    }

    /// Queue-depth snapshot for a single streamer (§4.10 fan-out).
    pub async fn queue_size(&self, queue_key: StreamId) -> Result<i64, EngineError> {
        Ok(QueueTaskRepo::new(&self.gateway).count_pending(queue_key).await?)
    }

    /// Currently active (spawned) streamer queues, for stats broadcasting.
    pub fn active_streamers(&self) -> Vec<(StreamId, StreamerId)> {
        self.active.lock().iter().map(|(k, v)| (*k, *v)).collect()
    }

    pub fn workers_per_streamer(&self) -> u32 {
        self.config.workers_per_streamer
    }

    /// Every task queued against `queue_key`, any status (§6 operator
    /// control-socket stream-tasks query).
    pub async fn list_stream_tasks(&self, queue_key: StreamId) -> Result<Vec<QueueTask>, EngineError> {
        Ok(QueueTaskRepo::new(&self.gateway).list_by_queue_key(queue_key).await?)
    }

    /// Cancels every non-terminal DAG task whose owning stream resolves to
    /// `queue_key`, propagating to dependents (§4.6 cancel propagation,
    /// S5). Returns the number of tasks moved to a cancelled/failed
    /// terminal state.
    pub async fn cancel_stream(&self, queue_key: StreamId) -> Result<u64, EngineError> {
        let incomplete = DependencyTaskRepo::new(&self.gateway).list_incomplete().await?;
        let mut affected = Vec::new();
        for task in &incomplete {
            if self.resolve_queue_key(&task.payload).await.ok() != Some(queue_key) {
                continue;
            }
            let effect = self.dependency.lock().cancel(&task.id);
            affected.push(task.id.clone());
            affected.extend(effect.newly_cancelled);
        }
        for id in &affected {
            DependencyTaskRepo::new(&self.gateway).update_status(id, streamvault_core::DependencyStatus::Cancelled).await.ok();
            if let Some(mut queued) = QueueTaskRepo::new(&self.gateway).get(id).await? {
                queued.status = QueueTaskStatus::Failed;
                queued.last_error = Some("cancelled: stream cancellation requested".to_string());
                QueueTaskRepo::new(&self.gateway).update_status(&queued).await?;
            }
        }
        Ok(affected.len() as u64)
    }
}

#[cfg(test)]
#[path = "queue_manager_tests.rs"]
mod tests;
