use super::*;

fn sample() -> Recording {
    Recording {
        id: RecordingId::new(1),
        stream_id: StreamId::new(1),
        path: "/data/shroud/2026-07/shroud_2026-07-28.ts".into(),
        status: RecordingStatus::Recording,
        start_time: Utc::now(),
        end_time: None,
        duration_seconds: None,
        file_size_bytes: None,
        error_message: None,
        failure_reason: None,
        error_at: None,
    }
}

#[test]
fn mark_failed_sets_reason_and_stamps_end_time_once() {
    let mut r = sample();
    let at = Utc::now();
    r.mark_failed("capture_tool_missing", "streamlink binary not found", at);
    assert_eq!(r.status, RecordingStatus::Failed);
    assert_eq!(r.failure_reason.as_deref(), Some("capture_tool_missing"));
    assert_eq!(r.end_time, Some(at));
}

#[test]
fn terminal_statuses() {
    assert!(RecordingStatus::Completed.is_terminal());
    assert!(RecordingStatus::Stopped.is_terminal());
    assert!(RecordingStatus::Failed.is_terminal());
    assert!(!RecordingStatus::Recording.is_terminal());
    assert!(!RecordingStatus::Processing.is_terminal());
}
