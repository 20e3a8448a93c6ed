// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use async_trait::async_trait;
use chrono::Utc;
use streamvault_adapters::{FakeFanoutTransport, FakeProcessSupervisor, ProcessId, ProcessRunStatus};
use streamvault_core::{FakeClock, Payload, Streamer, StreamerId};
use streamvault_storage::{ActiveRecordingRepo, Gateway, RecordingRepo, StreamRepo, StreamerRepo};

use super::*;
use crate::fanout::Fanout;
use crate::progress::{ProgressTracker, TaskState};
use crate::queue_manager::{QueueManagerConfig, TaskQueueManager};
use crate::worker_pool::{ProgressFn, TaskHandler, WorkerPool};

async fn test_gateway() -> Gateway {
    let url = std::env::var("STREAMVAULT_TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/streamvault_test".to_string());
    let gateway = Gateway::connect(&url).await.expect("test database must be reachable");
    gateway.migrate().await.expect("migrate");
    gateway
}

fn db_tests_enabled() -> bool {
    std::env::var("STREAMVAULT_TEST_DATABASE_URL").is_ok()
}

struct AlwaysOk;

#[async_trait]
impl TaskHandler for AlwaysOk {
    async fn execute(&self, _payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        progress(100);
        Ok(())
    }
}

async fn seed_streamer_and_stream(gateway: &Gateway) -> (StreamerId, StreamId) {
    let streamer = Streamer::new(StreamerId::new(0), format!("ext-{}", uuid::Uuid::new_v4()), "nightly_dev");
    StreamerRepo::new(gateway).upsert(&streamer).await.expect("insert streamer");
    let streamer_id = streamer.id;

    let stream = Stream {
        id: StreamId::new(0),
        streamer_id,
        external_stream_id: Some(format!("stream-{}", uuid::Uuid::new_v4())),
        title: "Hello".to_string(),
        category_name: None,
        language: None,
        started_at: Utc::now(),
        ended_at: None,
        episode_number: None,
        recording_path: None,
    };
    let stream_id = StreamRepo::new(gateway).insert(&stream).await.expect("insert stream");
    (streamer_id, stream_id)
}

type TestManager = RecordingLifecycleManager<FakeClock, FakeProcessSupervisor, FakeFanoutTransport>;

fn lifecycle_for(
    gateway: Gateway,
    recordings_root: std::path::PathBuf,
    max_concurrent_recordings: usize,
) -> (Arc<TestManager>, FakeProcessSupervisor, FakeFanoutTransport, Arc<ProgressTracker<FakeClock>>) {
    let clock = FakeClock::new(0);
    let tracker = Arc::new(ProgressTracker::new(clock.clone()));
    let mut pool = WorkerPool::new(clock.clone(), Arc::clone(&tracker));
    pool.register("metadata_generation", Arc::new(AlwaysOk));
    pool.register("mp4_remux", Arc::new(AlwaysOk));
    pool.register("mp4_validation", Arc::new(AlwaysOk));
    pool.register("thumbnail_generation", Arc::new(AlwaysOk));
    pool.register("cleanup", Arc::new(AlwaysOk));
    pool.register("segment_concatenation", Arc::new(AlwaysOk));
    let queue = Arc::new(TaskQueueManager::new(
        gateway.clone(),
        Arc::new(pool),
        Arc::clone(&tracker),
        clock.clone(),
        QueueManagerConfig::default(),
    ));

    let supervisor = FakeProcessSupervisor::new();
    let transport = FakeFanoutTransport::new();
    let fanout = Arc::new(Fanout::new(transport.clone()));

    let config = LifecycleConfig {
        recordings_root,
        max_concurrent_recordings,
        monitor_poll_interval: Duration::from_secs(3600),
        ..LifecycleConfig::default()
    };
    let manager = Arc::new(RecordingLifecycleManager::new(
        gateway,
        supervisor.clone(),
        Arc::clone(&tracker),
        fanout,
        queue,
        clock,
        config,
    ));
    (manager, supervisor, transport, tracker)
}

#[tokio::test]
async fn start_recording_creates_active_state_and_registers_capture_task() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, transport, tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    let recording_id = manager.start_recording(stream_id).await.expect("start_recording");

    let recording = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");
    assert_eq!(recording.status, RecordingStatus::Recording);

    let active = ActiveRecordingRepo::new(&gateway).get(stream_id).await.expect("query").expect("active row present");
    assert_eq!(active.recording_id, recording_id);

    let external = tracker.active_tasks();
    assert!(external.iter().any(|t| t.external && t.task_type == "capture_external_task"));

    assert!(transport.sent().iter().any(|m| m.contains("recording.started")));
}

#[tokio::test]
async fn start_recording_refuses_past_capacity_cap() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, transport, _tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 0);

    let err = manager.start_recording(stream_id).await.unwrap_err();
    assert!(matches!(err, EngineError::CapacityExceeded(_)));
    assert!(ActiveRecordingRepo::new(&gateway).get(stream_id).await.unwrap().is_none());
    assert!(!transport.sent().iter().any(|m| m.contains("recording.started")));
}

#[tokio::test]
async fn stop_recording_manual_with_missing_output_marks_failed() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, transport, _tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    let recording_id = manager.start_recording(stream_id).await.expect("start_recording");
    manager.stop_recording(recording_id, StopReason::Manual).await.expect("stop_recording");

    let recording = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");
    assert_eq!(recording.status, RecordingStatus::Failed);
    assert_eq!(recording.failure_reason.as_deref(), Some("capture_output_missing"));
    assert!(transport.sent().iter().any(|m| m.contains("recording.failed")));
    assert!(ActiveRecordingRepo::new(&gateway).get(stream_id).await.unwrap().is_none());
}

#[tokio::test]
async fn stop_recording_manual_with_existing_output_enqueues_dag_inline() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, transport, _tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    let recording_id = manager.start_recording(stream_id).await.expect("start_recording");
    let recording = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");
    if let Some(parent) = std::path::Path::new(&recording.path).parent() {
        std::fs::create_dir_all(parent).expect("mkdir");
    }
    std::fs::write(&recording.path, b"ts data").expect("write ts");

    manager.stop_recording(recording_id, StopReason::Manual).await.expect("stop_recording");

    let recording = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");
    assert_eq!(recording.status, RecordingStatus::Processing);
    assert!(transport.sent().iter().any(|m| m.contains("recording.stopped")));

    // Manual stop builds the DAG inline (DagTiming::Inline) before
    // returning, so the first step (metadata_generation, no deps) is
    // already promoted into the streamer's queue.
    let queue_size = manager.queue.queue_size(stream_id).await.expect("queue size");
    assert_eq!(queue_size, 1);
}

#[tokio::test]
async fn stop_recording_is_idempotent_on_an_already_terminal_recording() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, _transport, _tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    let recording_id = manager.start_recording(stream_id).await.expect("start_recording");
    manager.stop_recording(recording_id, StopReason::Manual).await.expect("first stop");
    let after_first = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");

    manager.stop_recording(recording_id, StopReason::Manual).await.expect("second stop is a no-op");
    let after_second = RecordingRepo::new(&gateway).get(recording_id).await.expect("recording row");
    assert_eq!(after_first.status, after_second.status);
    assert_eq!(after_first.error_at, after_second.error_at);
}

#[tokio::test]
async fn reap_stale_captures_completes_the_task_when_the_process_already_exited() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, supervisor, _transport, tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    manager.start_recording(stream_id).await.expect("start_recording");
    let process_id = ProcessId::for_stream(stream_id.get());
    supervisor.seed(&process_id, ProcessRunStatus::ExitedOk, None);

    let now = Utc::now() + chrono::Duration::seconds(1);
    let reaped = manager
        .reap_stale_captures(Duration::from_secs(0), Duration::from_secs(0), now)
        .await
        .expect("reap_stale_captures");

    assert_eq!(reaped, vec![stream_id]);
    let recent = tracker.recent_completed();
    assert!(recent.iter().any(|t| t.task_type == "capture_external_task" && t.state == TaskState::Completed));
}

#[tokio::test]
async fn reap_stale_captures_leaves_recent_heartbeats_untouched() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let (_, stream_id) = seed_streamer_and_stream(&gateway).await;
    let root = tempfile::tempdir().expect("tempdir");
    let (manager, _supervisor, _transport, _tracker) = lifecycle_for(gateway.clone(), root.path().to_path_buf(), 20);

    manager.start_recording(stream_id).await.expect("start_recording");

    let reaped = manager
        .reap_stale_captures(Duration::from_secs(600), Duration::from_secs(300), Utc::now())
        .await
        .expect("reap_stale_captures");

    assert!(reaped.is_empty());
    assert!(ActiveRecordingRepo::new(&gateway).get(stream_id).await.unwrap().is_some());
}
