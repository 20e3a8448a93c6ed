use super::*;
use chrono::Utc;

async fn test_gateway() -> Gateway {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for storage integration tests");
    let gateway = Gateway::connect(&url).await.expect("connect");
    gateway.migrate().await.expect("migrate");
    gateway
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn update_status_marks_failure_fields() {
    let gateway = test_gateway().await;
    let repo = RecordingRepo::new(&gateway);
    let mut recording = Recording {
        id: RecordingId::new(0),
        stream_id: StreamId::new(1),
        path: "/data/shroud/2026-07/shroud.ts".into(),
        status: RecordingStatus::Recording,
        start_time: Utc::now(),
        end_time: None,
        duration_seconds: None,
        file_size_bytes: None,
        error_message: None,
        failure_reason: None,
        error_at: None,
    };
    let id = repo.insert(&recording).await.unwrap();
    recording.id = id;
    recording.mark_failed("capture_tool_missing", "streamlink not found", Utc::now());
    repo.update_status(&recording).await.unwrap();

    let fetched = repo.get(id).await.unwrap();
    assert_eq!(fetched.status, RecordingStatus::Failed);
    assert_eq!(fetched.failure_reason.as_deref(), Some("capture_tool_missing"));
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn list_completed_and_list_all_paths_round_trip() {
    let gateway = test_gateway().await;
    let repo = RecordingRepo::new(&gateway);
    let recording = Recording {
        id: RecordingId::new(0),
        stream_id: StreamId::new(1),
        path: "/data/shroud/2026-07/shroud.mp4".into(),
        status: RecordingStatus::Recording,
        start_time: Utc::now(),
        end_time: None,
        duration_seconds: None,
        file_size_bytes: None,
        error_message: None,
        failure_reason: None,
        error_at: None,
    };
    let id = repo.insert(&recording).await.unwrap();
    let mut completed = recording.clone();
    completed.id = id;
    completed.status = RecordingStatus::Completed;
    repo.update_status(&completed).await.unwrap();

    let all_completed = repo.list_completed().await.unwrap();
    assert!(all_completed.iter().any(|r| r.id == id));

    let paths = repo.list_all_paths().await.unwrap();
    assert!(paths.contains(&"/data/shroud/2026-07/shroud.mp4".to_string()));
}
