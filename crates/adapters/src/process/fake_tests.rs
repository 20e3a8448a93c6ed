use super::*;

#[tokio::test]
async fn start_capture_tracks_an_active_process() {
    let supervisor = FakeProcessSupervisor::new();
    let spec = CaptureSpec {
        stream_id: 42,
        output_path: "/rec/alice/alice.ts",
        quality: "best",
        codec_preference: &["h264", "aac"],
        proxy_url: None,
        streamer_name: "alice",
    };
    let process_id = supervisor.start_capture(spec).await.unwrap();
    assert!(supervisor.is_active(&process_id).await);
}

#[tokio::test]
async fn terminate_removes_and_records_the_process() {
    let supervisor = FakeProcessSupervisor::new();
    let process_id = ProcessId::for_stream(1);
    supervisor.seed(&process_id, ProcessRunStatus::Running, Some(10.0));

    let clean = supervisor.terminate(&process_id, Duration::from_secs(15)).await.unwrap();
    assert!(clean);
    assert!(!supervisor.is_active(&process_id).await);
    assert_eq!(supervisor.terminations(), vec![process_id.0.clone()]);
}

#[tokio::test]
async fn terminate_unknown_process_is_an_error() {
    let supervisor = FakeProcessSupervisor::new();
    let result = supervisor.terminate(&ProcessId::for_stream(99), Duration::from_secs(1)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn graceful_shutdown_terminates_every_tracked_process() {
    let supervisor = FakeProcessSupervisor::new();
    supervisor.seed(&ProcessId::for_stream(1), ProcessRunStatus::Running, None);
    supervisor.seed(&ProcessId::for_stream(2), ProcessRunStatus::Running, None);

    supervisor.graceful_shutdown(Duration::from_secs(1)).await;

    assert!(!supervisor.is_active(&ProcessId::for_stream(1)).await);
    assert!(!supervisor.is_active(&ProcessId::for_stream(2)).await);
}
