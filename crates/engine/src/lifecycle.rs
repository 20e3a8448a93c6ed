// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording Lifecycle Manager (C8, §4.7): owns the start/stop/completion
//! path for a single live capture, from spawning the capture child through
//! handing the finished file off to the post-processing DAG (C6/C7/C9).
//!
//! One capture monitor task runs per active recording, polling
//! [`ProcessSupervisor::progress`]/[`ProcessSupervisor::is_active`] on the
//! [`QueueManagerConfig`](crate::queue_manager::QueueManagerConfig)-style
//! cadence and touching the heartbeat the reaper (C10) later reads.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use streamvault_adapters::{CaptureSpec, FanoutTransport, ProcessId, ProcessSupervisor};
use streamvault_core::{
    ActiveRecordingState, ActiveRecordingStatus, Clock, DependencyStatus, DependencyTask, Payload, Priority,
    Recording, RecordingId, RecordingStatus, StepName, Stream, StreamId, StreamerId, TaskId,
};
use streamvault_storage::{
    ActiveRecordingRepo, DependencyTaskRepo, Gateway, ProcessingStateRepo, RecordingRepo, StreamRepo, StreamerRepo,
};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::EngineError;
use crate::fanout::Fanout;
use crate::paths::RecordingPaths;
use crate::progress::{SharedProgressTracker, TaskState};
use crate::queue_manager::TaskQueueManager;

/// Caller-supplied facts about a live stream `force_start_recording` has no
/// other way to learn, since core never calls out to Twitch itself (§6, §9
/// supplement).
#[derive(Debug, Clone)]
pub struct LiveStreamInfo {
    pub external_stream_id: Option<String>,
    pub title: String,
    pub category_name: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The platform event handler observed the stream end; post-processing
    /// is enqueued fire-and-forget so the caller isn't blocked (§4.7).
    Automatic,
    /// An operator explicitly asked for the recording to stop.
    Manual,
    /// Daemon shutdown: no post-processing is enqueued here, since the
    /// durable `Recording`/`ActiveRecordingState` rows let the next boot's
    /// recovery scan (C10) pick the DAG back up.
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct LifecycleConfig {
    pub recordings_root: PathBuf,
    pub default_quality: String,
    pub codec_preference: Vec<String>,
    /// I4-adjacent cap on simultaneous captures, independent of the
    /// per-streamer queue concurrency limits (P9/S6).
    pub max_concurrent_recordings: usize,
    /// Grace window before [`ProcessSupervisor::terminate`] escalates to a
    /// force-kill (§9 Open Question 2 default: 15s).
    pub termination_grace: Duration,
    /// How often the capture monitor polls progress and touches the
    /// heartbeat.
    pub monitor_poll_interval: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            recordings_root: PathBuf::from("/var/lib/streamvault/recordings"),
            default_quality: "best".to_string(),
            codec_preference: vec!["h264".to_string(), "hevc".to_string()],
            max_concurrent_recordings: 20,
            termination_grace: Duration::from_secs(15),
            monitor_poll_interval: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureOutcome {
    Completed,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DagTiming {
    /// No DAG is built (shutdown: the next boot's recovery scan does it).
    None,
    /// Build and seed the DAG before returning.
    Inline,
    /// Build the DAG on a detached task so the caller isn't blocked.
    Spawned,
}

pub struct RecordingLifecycleManager<C: Clock, P: ProcessSupervisor, T: FanoutTransport> {
    pub(crate) gateway: Gateway,
    supervisor: P,
    pub(crate) tracker: SharedProgressTracker<C>,
    pub(crate) fanout: Arc<Fanout<T>>,
    pub(crate) queue: Arc<TaskQueueManager<C>>,
    pub(crate) clock: C,
    config: LifecycleConfig,
    shutting_down: AtomicBool,
    monitors: Mutex<HashMap<StreamId, JoinHandle<()>>>,
    /// Correlates a live stream with the external task tracking its
    /// capture in C4, in both directions: `stop_recording` needs
    /// stream -> task, the reaper's stuck-capture rule needs task -> stream.
    capture_tasks: Mutex<HashMap<StreamId, TaskId>>,
    pub(crate) task_streams: Mutex<HashMap<TaskId, StreamId>>,
}

impl<C: Clock, P: ProcessSupervisor, T: FanoutTransport> RecordingLifecycleManager<C, P, T> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        gateway: Gateway,
        supervisor: P,
        tracker: SharedProgressTracker<C>,
        fanout: Arc<Fanout<T>>,
        queue: Arc<TaskQueueManager<C>>,
        clock: C,
        config: LifecycleConfig,
    ) -> Self {
        Self {
            gateway,
            supervisor,
            tracker,
            fanout,
            queue,
            clock,
            config,
            shutting_down: AtomicBool::new(false),
            monitors: Mutex::new(HashMap::new()),
            capture_tasks: Mutex::new(HashMap::new()),
            task_streams: Mutex::new(HashMap::new()),
        }
    }

    pub(crate) fn config(&self) -> &LifecycleConfig {
        &self.config
    }

    pub(crate) fn stream_id_for_task(&self, id: &TaskId) -> Option<StreamId> {
        self.task_streams.lock().get(id).copied()
    }

    /// Starts capturing `stream_id`. Fails with
    /// [`EngineError::CapacityExceeded`] once `max_concurrent_recordings`
    /// active captures are already running (P9/S6: no `Recording` row is
    /// created and no `recording.started` event is broadcast on refusal).
    pub async fn start_recording(self: &Arc<Self>, stream_id: StreamId) -> Result<RecordingId, EngineError> {
        if self.shutting_down.load(Ordering::SeqCst) {
            return Err(EngineError::OperatorVisible {
                context: "start_recording".to_string(),
                message: "lifecycle manager is shutting down".to_string(),
            });
        }

        let active_count = ActiveRecordingRepo::new(&self.gateway).list_all().await?.len();
        if active_count >= self.config.max_concurrent_recordings {
            return Err(EngineError::CapacityExceeded(format!(
                "max_concurrent_recordings ({}) reached",
                self.config.max_concurrent_recordings
            )));
        }

        let stream = StreamRepo::new(&self.gateway).get(stream_id).await?;
        let streamer = StreamerRepo::new(&self.gateway).get(stream.streamer_id).await?;
        let now = self.clock.now_utc();

        let max_episode = StreamRepo::new(&self.gateway).max_episode_number_this_month(streamer.id, now).await?;
        let episode = max_episode.unwrap_or(0) + 1;
        StreamRepo::new(&self.gateway).set_episode_number(stream_id, episode).await?;

        let paths = RecordingPaths::build(&self.config.recordings_root, &streamer.username, &stream.title, stream.started_at, episode);
        std::fs::create_dir_all(paths.dir())?;

        let recording = Recording {
            id: RecordingId::new(0),
            stream_id,
            path: paths.ts_path().display().to_string(),
            status: RecordingStatus::Recording,
            start_time: now,
            end_time: None,
            duration_seconds: None,
            file_size_bytes: None,
            error_message: None,
            failure_reason: None,
            error_at: None,
        };
        let recording_id = RecordingRepo::new(&self.gateway).insert(&recording).await?;

        let process_id = ProcessId::for_stream(stream_id.get());
        let codec_preference: Vec<&str> = self.config.codec_preference.iter().map(String::as_str).collect();
        let spec = CaptureSpec {
            stream_id: stream_id.get(),
            output_path: recording.path.as_str(),
            quality: &self.config.default_quality,
            codec_preference: &codec_preference,
            proxy_url: None,
            streamer_name: &streamer.username,
        };
        if let Err(err) = self.supervisor.start_capture(spec).await {
            RecordingRepo::new(&self.gateway)
                .update_status(&{
                    let mut r = recording.clone();
                    r.mark_failed("capture_spawn_failed", err.to_string(), now);
                    r.id = recording_id;
                    r
                })
                .await?;
            return Err(err.into());
        }

        let state = ActiveRecordingState {
            stream_id,
            recording_id,
            // The process-supervisor abstraction deliberately doesn't leak
            // real OS pids across its trait boundary (fakes couldn't
            // provide one); `process_identifier` is the authoritative
            // correlation key for liveness checks.
            os_pid: 0,
            process_identifier: process_id.to_string(),
            streamer_name: streamer.username.clone(),
            started_at: now,
            ts_output_path: recording.path.clone(),
            forced: false,
            quality: self.config.default_quality.clone(),
            status: ActiveRecordingStatus::Active,
            last_heartbeat: now,
            config: serde_json::json!({}),
        };
        ActiveRecordingRepo::new(&self.gateway).upsert(&state).await?;

        let capture_task_id = TaskId::generate();
        self.tracker.add(capture_task_id.clone(), "capture_external_task", true);
        self.tracker.update_status(&capture_task_id, TaskState::Running, None);
        self.tracker.update_progress(&capture_task_id, 50);
        self.capture_tasks.lock().insert(stream_id, capture_task_id.clone());
        self.task_streams.lock().insert(capture_task_id.clone(), stream_id);

        self.fanout.recording_started(recording_id, stream_id, streamer.id).await;
        info!(recording_id = recording_id.get(), stream_id = stream_id.get(), "recording started");

        self.spawn_monitor(stream_id, recording_id, streamer.id, process_id, capture_task_id);

        Ok(recording_id)
    }

    /// Starts capturing a streamer the poll loop hasn't (yet) discovered as
    /// live, using caller-supplied [`LiveStreamInfo`] in place of the usual
    /// platform poll (§9 supplement: core never calls Twitch itself).
    pub async fn force_start(
        self: &Arc<Self>,
        streamer_id: StreamerId,
        info: LiveStreamInfo,
    ) -> Result<RecordingId, EngineError> {
        let stream_id = match StreamRepo::new(&self.gateway).find_live(streamer_id).await? {
            Some(stream) => stream.id,
            None => {
                let now = self.clock.now_utc();
                let stream = Stream {
                    id: StreamId::new(0),
                    streamer_id,
                    external_stream_id: info.external_stream_id,
                    title: info.title,
                    category_name: info.category_name,
                    language: info.language,
                    started_at: now,
                    ended_at: None,
                    episode_number: None,
                    recording_path: None,
                };
                StreamRepo::new(&self.gateway).insert(&stream).await?
            }
        };

        let recording_id = self.start_recording(stream_id).await?;
        if let Some(mut state) = ActiveRecordingRepo::new(&self.gateway).get(stream_id).await? {
            state.forced = true;
            ActiveRecordingRepo::new(&self.gateway).upsert(&state).await?;
        }
        Ok(recording_id)
    }

    /// Stops an in-progress recording. Per §6: the `Recording` row is
    /// always updated to a terminal-or-processing status regardless of
    /// whether process termination itself succeeded.
    pub async fn stop_recording(self: &Arc<Self>, recording_id: RecordingId, reason: StopReason) -> Result<(), EngineError> {
        let recording = RecordingRepo::new(&self.gateway).get(recording_id).await?;
        if recording.status.is_terminal() {
            return Ok(());
        }
        let stream_id = recording.stream_id;

        if let Some(handle) = self.monitors.lock().remove(&stream_id) {
            handle.abort();
        }

        let process_id = ProcessId::for_stream(stream_id.get());
        if let Err(err) = self.supervisor.terminate(&process_id, self.config.termination_grace).await {
            warn!(recording_id = recording_id.get(), error = %err, "process termination failed; recording still marked stopped");
        }

        let timing = match reason {
            StopReason::Automatic => DagTiming::Spawned,
            StopReason::Manual => DagTiming::Inline,
            StopReason::Shutdown => DagTiming::None,
        };
        self.finalize_recording(recording_id, CaptureOutcome::Stopped, timing).await?;
        Ok(())
    }

    /// Terminates every tracked capture and stops accepting new ones.
    /// Active recordings are left in their durable state for the next
    /// boot's recovery scan (C10) to pick back up — no post-processing DAG
    /// is built here.
    pub async fn graceful_shutdown(self: &Arc<Self>, timeout: Duration) {
        self.shutting_down.store(true, Ordering::SeqCst);

        let stream_ids: Vec<StreamId> = self.monitors.lock().keys().copied().collect();
        for stream_id in stream_ids {
            if let Ok(Some(state)) = ActiveRecordingRepo::new(&self.gateway).get(stream_id).await {
                let _ = self.stop_recording(state.recording_id, StopReason::Shutdown).await;
            }
        }
        self.supervisor.graceful_shutdown(timeout).await;
    }

    /// Manually re-seeds the post-processing DAG for one recording — the
    /// same resume path the startup orphan scan (C10) uses, exposed for
    /// the operator control socket's `EnqueuePostProcessing` command
    /// (§6).
    pub async fn resume_post_processing(&self, recording_id: RecordingId) -> Result<(), EngineError> {
        let recording = RecordingRepo::new(&self.gateway).get(recording_id).await?;
        build_post_processing_dag(&self.gateway, &self.queue, &recording, self.clock.now_utc()).await
    }

    /// Reaper hook (C10, §4.9): captures whose `ActiveRecordingState`
    /// heartbeat has gone stale (no heartbeat for `no_heartbeat_for`,
    /// running at least `min_age`) are resolved without waiting for the
    /// monitor's next 10s tick — completed if the child process is still
    /// reported dead by the supervisor, failed otherwise. Returns the
    /// stream IDs it acted on, for the caller to log/broadcast.
    pub(crate) async fn reap_stale_captures(
        self: &Arc<Self>,
        min_age: Duration,
        no_heartbeat_for: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<StreamId>, EngineError> {
        let mut reaped = Vec::new();
        for state in ActiveRecordingRepo::new(&self.gateway).list_all().await? {
            let age = now.signed_duration_since(state.started_at);
            let since_heartbeat = now.signed_duration_since(state.last_heartbeat);
            if age < chrono::Duration::from_std(min_age).unwrap_or_default()
                || since_heartbeat < chrono::Duration::from_std(no_heartbeat_for).unwrap_or_default()
            {
                continue;
            }

            let process_id = ProcessId::for_stream(state.stream_id.get());
            let still_alive = self.supervisor.is_active(&process_id).await;
            let Some(task_id) = self.capture_tasks.lock().remove(&state.stream_id) else {
                continue;
            };
            self.task_streams.lock().remove(&task_id);

            if still_alive {
                self.tracker.update_status(&task_id, TaskState::Failed, Some("stale heartbeat; process still running".to_string()));
            } else {
                self.tracker.update_status(&task_id, TaskState::Completed, None);
            }
            if let Some(handle) = self.monitors.lock().remove(&state.stream_id) {
                handle.abort();
            }
            reaped.push(state.stream_id);
        }
        Ok(reaped)
    }

    fn spawn_monitor(
        self: &Arc<Self>,
        stream_id: StreamId,
        recording_id: RecordingId,
        streamer_id: StreamerId,
        process_id: ProcessId,
        capture_task_id: TaskId,
    ) {
        let manager = Arc::clone(self);
        let handle = tokio::spawn(async move {
            manager.monitor_loop(stream_id, recording_id, streamer_id, process_id, capture_task_id).await;
        });
        self.monitors.lock().insert(stream_id, handle);
    }

    async fn monitor_loop(
        self: Arc<Self>,
        stream_id: StreamId,
        recording_id: RecordingId,
        streamer_id: StreamerId,
        process_id: ProcessId,
        capture_task_id: TaskId,
    ) {
        loop {
            tokio::time::sleep(self.config.monitor_poll_interval).await;
            if self.shutting_down.load(Ordering::SeqCst) {
                return;
            }

            if let Some(progress) = self.supervisor.progress(&process_id).await {
                // §9 Open Question 1: a real sample replaces the 50%
                // placeholder once available; reported as elapsed minutes
                // capped at 99 (a live capture has no fixed end, so there
                // is no true percent-of-total to compute).
                if let Some(seconds) = progress.duration_seconds {
                    let minutes = (seconds / 60.0).floor().max(0.0) as u64;
                    let pct = minutes.min(99) as u8;
                    self.tracker.update_progress(&capture_task_id, pct);
                    self.fanout.recording_progress(recording_id, stream_id, streamer_id, pct).await;
                }
            }

            if ActiveRecordingRepo::new(&self.gateway).touch_heartbeat(stream_id, self.clock.now_utc()).await.is_err() {
                continue;
            }

            if !self.supervisor.is_active(&process_id).await {
                let _ = self.finalize_recording(recording_id, CaptureOutcome::Completed, DagTiming::Spawned).await;
                self.monitors.lock().remove(&stream_id);
                return;
            }
        }
    }

    /// Shared completion path for both "the monitor noticed the child
    /// exited on its own" and "an explicit stop was requested": resolves
    /// the final on-disk path (segments dir wins over the plain `.ts` per
    /// §4.7's tie-break), records the outcome, clears the active-recording
    /// row, and (unless `dag_timing` is [`DagTiming::None`]) seeds the
    /// post-processing DAG.
    async fn finalize_recording(
        &self,
        recording_id: RecordingId,
        outcome: CaptureOutcome,
        dag_timing: DagTiming,
    ) -> Result<Recording, EngineError> {
        let mut recording = RecordingRepo::new(&self.gateway).get(recording_id).await?;
        if recording.status.is_terminal() {
            return Ok(recording);
        }
        let stream_id = recording.stream_id;
        let stream = StreamRepo::new(&self.gateway).get(stream_id).await?;
        let streamer = StreamerRepo::new(&self.gateway).get(stream.streamer_id).await?;
        let paths = RecordingPaths::build(
            &self.config.recordings_root,
            &streamer.username,
            &stream.title,
            stream.started_at,
            stream.episode_number.unwrap_or(1),
        );

        let (resolved_path, exists) = if paths.segments_dir().exists() {
            (paths.segments_dir(), true)
        } else {
            (paths.ts_path(), paths.ts_path().exists())
        };
        recording.path = resolved_path.display().to_string();

        let now = self.clock.now_utc();
        recording.end_time.get_or_insert(now);
        if exists {
            let size = std::fs::metadata(&resolved_path).map(|m| m.len() as i64).ok();
            recording.file_size_bytes = size;
            recording.duration_seconds = Some(
                recording.end_time.unwrap_or(now).signed_duration_since(recording.start_time).num_seconds().max(0),
            );
            // Post-processing still has to run, so the row stays
            // non-terminal; `list_non_terminal` (C10) depends on this to
            // find a recording whose DAG was interrupted mid-flight.
            recording.status = RecordingStatus::Processing;
        } else {
            recording.mark_failed(
                "capture_output_missing",
                format!("expected capture output at {}", recording.path),
                now,
            );
        }
        RecordingRepo::new(&self.gateway).update_status(&recording).await?;
        ActiveRecordingRepo::new(&self.gateway).remove(stream_id).await?;
        StreamRepo::new(&self.gateway).mark_ended(stream_id, now, Some(&recording.path)).await?;

        if let Some(task_id) = self.capture_tasks.lock().remove(&stream_id) {
            self.task_streams.lock().remove(&task_id);
            let state = if exists { TaskState::Completed } else { TaskState::Failed };
            self.tracker.update_status(&task_id, state, recording.error_message.clone());
        }

        if exists {
            match outcome {
                CaptureOutcome::Completed => {
                    self.fanout
                        .recording_completed(recording.id, stream_id, streamer.id, Some(recording.path.clone()), recording.file_size_bytes)
                        .await;
                }
                CaptureOutcome::Stopped => {
                    self.fanout.recording_stopped(recording.id, stream_id, streamer.id).await;
                }
            }
        } else {
            self.fanout
                .recording_failed(recording.id, stream_id, streamer.id, recording.error_message.clone().unwrap_or_default())
                .await;
        }

        if exists {
            match dag_timing {
                DagTiming::None => {}
                DagTiming::Inline => {
                    build_post_processing_dag(&self.gateway, &self.queue, &recording, now).await?;
                }
                DagTiming::Spawned => {
                    let gateway = self.gateway.clone();
                    let queue = Arc::clone(&self.queue);
                    let recording_for_task = recording.clone();
                    tokio::spawn(async move {
                        if let Err(err) = build_post_processing_dag(&gateway, &queue, &recording_for_task, now).await {
                            warn!(recording_id = recording_for_task.id.get(), error = %err, "failed to enqueue post-processing");
                        }
                    });
                }
            }
        }

        Ok(recording)
    }
}

async fn step_done(gateway: &Gateway, recording_id: RecordingId, steps: &[StepName]) -> Result<bool, EngineError> {
    for step in steps {
        let done = ProcessingStateRepo::new(gateway)
            .get(recording_id, *step)
            .await?
            .map(|s| s.is_complete())
            .unwrap_or(false);
        if !done {
            return Ok(false);
        }
    }
    Ok(true)
}

async fn seed_dag_node<C: Clock>(
    gateway: &Gateway,
    queue: &Arc<TaskQueueManager<C>>,
    payload: Payload,
    depends_on: Vec<TaskId>,
    already_done: bool,
    now: DateTime<Utc>,
) -> Result<TaskId, EngineError> {
    let id = TaskId::generate();
    let status = if already_done { DependencyStatus::Completed } else { DependencyStatus::Pending };
    let dep = DependencyTask {
        id: id.clone(),
        payload,
        depends_on,
        status,
        created_at: now,
    };
    DependencyTaskRepo::new(gateway).insert(&dep).await?;
    queue.seed_dependency_task(crate::dependency::DagNode::new(dep, Priority::Normal))?;
    Ok(id)
}

/// Builds (or resumes) the `[segment_concatenation]? -> [metadata_generation]
/// -> [mp4_remux] -> [mp4_validation] -> [thumbnail_generation] -> [cleanup]`
/// chain (§4.8). Steps already `completed`/`skipped` in
/// `RecordingProcessingState` are seeded pre-completed so a re-run after a
/// crash resumes at the earliest incomplete step (P7) instead of redoing
/// finished work.
pub(crate) async fn build_post_processing_dag<C: Clock>(
    gateway: &Gateway,
    queue: &Arc<TaskQueueManager<C>>,
    recording: &Recording,
    now: DateTime<Utc>,
) -> Result<(), EngineError> {
    let segmented = std::path::Path::new(&recording.path).is_dir();
    let mut previous: Option<TaskId> = None;

    if segmented {
        let id = seed_dag_node(
            gateway,
            queue,
            Payload::SegmentConcatenation { recording_id: recording.id },
            vec![],
            false,
            now,
        )
        .await?;
        previous = Some(id);
    }

    let metadata_done = step_done(gateway, recording.id, &[StepName::Metadata, StepName::Chapters]).await?;
    let id = seed_dag_node(
        gateway,
        queue,
        Payload::MetadataGeneration { recording_id: recording.id },
        previous.clone().into_iter().collect(),
        metadata_done,
        now,
    )
    .await?;
    previous = Some(id);

    let remux_done = step_done(gateway, recording.id, &[StepName::Mp4Remux]).await?;
    let id = seed_dag_node(
        gateway,
        queue,
        Payload::Mp4Remux { recording_id: recording.id },
        previous.clone().into_iter().collect(),
        remux_done,
        now,
    )
    .await?;
    previous = Some(id);

    let validation_done = step_done(gateway, recording.id, &[StepName::Mp4Validation]).await?;
    let id = seed_dag_node(
        gateway,
        queue,
        Payload::Mp4Validation { recording_id: recording.id },
        previous.clone().into_iter().collect(),
        validation_done,
        now,
    )
    .await?;
    previous = Some(id);

    let thumbnail_done = step_done(gateway, recording.id, &[StepName::Thumbnail]).await?;
    let id = seed_dag_node(
        gateway,
        queue,
        Payload::ThumbnailGeneration { recording_id: recording.id },
        previous.clone().into_iter().collect(),
        thumbnail_done,
        now,
    )
    .await?;
    previous = Some(id);

    let cleanup_done = step_done(gateway, recording.id, &[StepName::Cleanup]).await?;
    seed_dag_node(
        gateway,
        queue,
        Payload::Cleanup { recording_id: recording.id },
        previous.into_iter().collect(),
        cleanup_done,
        now,
    )
    .await?;

    queue.promote_ready().await?;
    Ok(())
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
