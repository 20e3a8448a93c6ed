use super::*;
use streamvault_adapters::FakeFanoutTransport;
use streamvault_core::{RecordingId, StreamId, StreamerId};

fn tracked_task(id: TaskId, state: TaskState) -> crate::progress::TrackedTask {
    crate::progress::TrackedTask {
        id,
        task_type: "mp4_remux".to_string(),
        state,
        progress: if state == TaskState::Completed { 100 } else { 0 },
        external: false,
        created_at: chrono::Utc::now(),
        started_at: None,
        completed_at: None,
        error_message: None,
        retry_count: 0,
    }
}

#[tokio::test]
async fn status_change_sends_a_task_status_update() {
    let fake = FakeFanoutTransport::new();
    let fo = Fanout::new(fake.clone());
    let id = TaskId::generate();
    fo.on_progress_event("mp4_remux", ProgressEvent::StatusChanged(tracked_task(id, TaskState::Running)))
        .await;
    let messages = fake.sent();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("task_status_update"));
    assert!(messages[0].contains("\"running\""));
}

#[tokio::test]
async fn progress_change_sends_a_task_progress_update() {
    let fake = FakeFanoutTransport::new();
    let fo = Fanout::new(fake.clone());
    let id = TaskId::generate();
    fo.on_progress_event("mp4_remux", ProgressEvent::ProgressChanged { id, progress: 42 })
        .await;
    let messages = fake.sent();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("task_progress_update"));
    assert!(messages[0].contains("42"));
}

#[tokio::test]
async fn recording_lifecycle_events_send_distinct_message_types() {
    let fake = FakeFanoutTransport::new();
    let fo = Fanout::new(fake.clone());
    let recording_id = RecordingId::new(1);
    let stream_id = StreamId::new(2);
    let streamer_id = StreamerId::new(3);

    fo.recording_started(recording_id, stream_id, streamer_id).await;
    fo.recording_completed(recording_id, stream_id, streamer_id, Some("a.mp4".to_string()), Some(1024)).await;
    fo.recording_stopped(recording_id, stream_id, streamer_id).await;
    fo.recording_failed(recording_id, stream_id, streamer_id, "capture_spawn_failed".to_string()).await;
    fo.recording_progress(recording_id, stream_id, streamer_id, 50).await;

    let messages = fake.sent();
    assert_eq!(messages.len(), 5);
    assert!(messages[0].contains("recording.started"));
    assert!(messages[1].contains("recording.completed"));
    assert!(messages[1].contains("a.mp4"));
    assert!(messages[2].contains("recording.stopped"));
    assert!(messages[3].contains("recording.failed"));
    assert!(messages[3].contains("capture_spawn_failed"));
    assert!(messages[4].contains("recording.progress"));
}

#[tokio::test]
async fn snapshot_is_suppressed_when_unchanged() {
    let fake = FakeFanoutTransport::new();
    let fo = Fanout::new(fake.clone());

    fo.broadcast_snapshot(3, 1, 0, 1, vec![]).await;
    fo.broadcast_snapshot(3, 1, 0, 1, vec![]).await;

    assert_eq!(fake.sent().len(), 1);
}

#[tokio::test]
async fn snapshot_resends_once_content_changes() {
    let fake = FakeFanoutTransport::new();
    let fo = Fanout::new(fake.clone());

    fo.broadcast_snapshot(3, 1, 0, 1, vec![]).await;
    fo.broadcast_snapshot(4, 1, 0, 1, vec![]).await;

    assert_eq!(fake.sent().len(), 2);
}

#[tokio::test]
async fn connection_count_is_delegated_to_the_transport() {
    let fake = FakeFanoutTransport::new();
    fake.set_connection_count(7);
    let fo = Fanout::new(fake);
    assert_eq!(fo.connection_count(), 7);
}
