// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Translates operator control-socket [`Request`]s into calls against the
//! already-wired engine components and serializes the result back as a
//! [`Response`] (§6).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use streamvault_adapters::{TokioProcessSupervisor, TungsteniteFanout};
use streamvault_core::SystemClock;
use streamvault_daemon::{
    HealthSummary, OkPayload, Request, Response, StreamerQueueStatsEntry, TaskStatsSummary, TrackedTaskEntry,
};
use streamvault_engine::{
    LiveStreamInfo, ProgressTracker, RecordingLifecycleManager, TaskQueueManager, TaskState, TrackedTask,
};
use streamvault_storage::Gateway;

type Supervisor = TokioProcessSupervisor;
type Transport = TungsteniteFanout;
type Lifecycle = RecordingLifecycleManager<SystemClock, Supervisor, Transport>;

pub struct Context {
    pub gateway: Gateway,
    pub queue: Arc<TaskQueueManager<SystemClock>>,
    pub lifecycle: Arc<Lifecycle>,
    pub tracker: Arc<ProgressTracker<SystemClock>>,
    pub started_at: DateTime<Utc>,
}

fn state_label(state: TaskState) -> &'static str {
    match state {
        TaskState::Pending => "pending",
        TaskState::Running => "running",
        TaskState::Completed => "completed",
        TaskState::Failed => "failed",
    }
}

fn entry(task: TrackedTask) -> TrackedTaskEntry {
    TrackedTaskEntry {
        id: task.id.as_str().to_string(),
        task_type: task.task_type,
        state: state_label(task.state).to_string(),
        progress: task.progress,
        external: task.external,
        error_message: task.error_message,
        retry_count: task.retry_count,
    }
}

pub async fn handle(ctx: &Context, request: Request) -> Response {
    match dispatch(ctx, request).await {
        Ok(payload) => Response::Ok(payload),
        Err(message) => Response::Error { message },
    }
}

async fn dispatch(ctx: &Context, request: Request) -> Result<OkPayload, String> {
    match request {
        Request::Ping => Ok(OkPayload::Pong),
        Request::Health => {
            let database_reachable = ctx.gateway.is_reachable().await;
            let uptime_seconds = (Utc::now() - ctx.started_at).num_seconds().max(0) as u64;
            Ok(OkPayload::Health(HealthSummary {
                database_reachable,
                uptime_seconds,
            }))
        }
        Request::TaskStats => {
            let stats = ctx.tracker.stats();
            Ok(OkPayload::TaskStats(TaskStatsSummary {
                active: stats.active,
                completed: stats.completed,
                external: stats.external,
            }))
        }
        Request::ActiveTasks => {
            Ok(OkPayload::Tasks(ctx.tracker.active_tasks().into_iter().map(entry).collect()))
        }
        Request::RecentTasks => {
            Ok(OkPayload::Tasks(ctx.tracker.recent_completed().into_iter().map(entry).collect()))
        }
        Request::TaskById { id } => Ok(OkPayload::Task(ctx.tracker.get(&id).map(entry))),
        Request::StreamTasks { stream_id } => {
            let tasks = ctx.queue.list_stream_tasks(stream_id).await.map_err(|e| e.to_string())?;
            let entries = tasks
                .into_iter()
                .filter_map(|t| ctx.tracker.get(&t.id))
                .map(entry)
                .collect();
            Ok(OkPayload::Tasks(entries))
        }
        Request::CancelStream { stream_id } => {
            let cancelled = ctx.queue.cancel_stream(stream_id).await.map_err(|e| e.to_string())?;
            Ok(OkPayload::Cancelled { cancelled })
        }
        Request::EnqueuePostProcessing { recording_id } => {
            ctx.lifecycle.resume_post_processing(recording_id).await.map_err(|e| e.to_string())?;
            Ok(OkPayload::Enqueued { task_ids: vec![] })
        }
        Request::AdminCleanup => {
            let report = streamvault_engine::run_cleanup_sweep(
                &ctx.gateway,
                streamvault_engine::CleanupConfig::default(),
                Utc::now(),
            )
            .await
            .map_err(|e| e.to_string())?;
            Ok(OkPayload::Cleanup {
                sessions_deleted: report.sessions_deleted,
                tokens_deleted: report.tokens_deleted,
            })
        }
        Request::QueueStats => {
            let mut entries = Vec::new();
            for (stream_id, _streamer_id) in ctx.queue.active_streamers() {
                let pending = ctx.queue.queue_size(stream_id).await.map_err(|e| e.to_string())?;
                entries.push(StreamerQueueStatsEntry {
                    stream_id: stream_id.get(),
                    pending,
                });
            }
            Ok(OkPayload::QueueStats(entries))
        }
        Request::ForceStart {
            streamer_id,
            title,
            category_name,
            language,
            external_stream_id,
        } => {
            let info = LiveStreamInfo {
                external_stream_id,
                title,
                category_name,
                language,
            };
            let recording_id = ctx.lifecycle.force_start(streamer_id, info).await.map_err(|e| e.to_string())?;
            Ok(OkPayload::Started {
                recording_id: recording_id.get(),
            })
        }
    }
}
