use super::*;

#[test]
fn parse_progress_line_reads_ffmpeg_style_time() {
    let line = "frame=  120 fps= 30 time=00:01:05.00 bitrate=1000kbits/s";
    assert_eq!(parse_progress_line(line), Some(65.0));
}

#[test]
fn parse_progress_line_reads_duration_marker() {
    let line = "Duration: 01:00:00.00, start: 0.000000";
    assert_eq!(parse_progress_line(line), Some(3600.0));
}

#[test]
fn parse_progress_line_degrades_gracefully_on_garbage() {
    assert_eq!(parse_progress_line("some unrelated log line"), None);
}

#[tokio::test]
async fn start_capture_spawns_and_tracks_a_process() {
    let dir = tempfile::tempdir().unwrap();
    // Use `echo`-backed capture binary via env override so the test never
    // depends on a real streamlink install.
    std::env::set_var("STREAMVAULT_CAPTURE_BIN", "echo");
    let supervisor = TokioProcessSupervisor::new(dir.path().to_path_buf());
    let spec = CaptureSpec {
        stream_id: 7,
        output_path: "/tmp/out.ts",
        quality: "best",
        codec_preference: &["h264"],
        proxy_url: None,
        streamer_name: "alice",
    };
    let process_id = supervisor.start_capture(spec).await.unwrap();
    // `echo` exits immediately; give the reader tasks a moment to drain.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let _ = supervisor.is_active(&process_id).await;
    std::env::remove_var("STREAMVAULT_CAPTURE_BIN");
}
