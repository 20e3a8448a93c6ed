// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use streamvault_adapters::{CaptureSpec, ProcessError, ProcessId, ProcessProgress, ProcessRunStatus, ProcessSupervisor};
use streamvault_core::{Recording, RecordingId, RecordingStatus, Stream, StreamId, Streamer, StreamerId};
use streamvault_storage::{Gateway, RecordingRepo, StreamMetadataRepo, StreamRepo, StreamerRepo};
use tempfile::TempDir;

use super::*;

fn db_tests_enabled() -> bool {
    std::env::var("STREAMVAULT_TEST_DATABASE_URL").is_ok()
}

async fn test_gateway() -> Gateway {
    let url = std::env::var("STREAMVAULT_TEST_DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/streamvault_test".to_string());
    let gateway = Gateway::connect(&url).await.expect("test database must be reachable");
    gateway.migrate().await.expect("migrate");
    gateway
}

/// Always exits OK and touches whatever path was passed as the final
/// muxer argument, standing in for ffmpeg actually producing output.
#[derive(Clone, Default)]
struct ScriptedSupervisor {
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedSupervisor {
    fn invocation_count(&self) -> usize {
        self.invocations.lock().len()
    }
}

#[async_trait]
impl ProcessSupervisor for ScriptedSupervisor {
    async fn start_capture(&self, spec: CaptureSpec<'_>) -> Result<ProcessId, ProcessError> {
        Ok(ProcessId::for_stream(spec.stream_id))
    }

    async fn start_remux(&self, _process_id: &ProcessId, args: &[String]) -> Result<(), ProcessError> {
        self.invocations.lock().push(args.to_vec());
        if let Some(output) = args.last() {
            let _ = std::fs::write(output, b"\x00\x00\x00\x18ftypisom\x00\x00\x02\x00isomiso2avc1mp41");
        }
        Ok(())
    }

    async fn terminate(&self, _process_id: &ProcessId, _grace: Duration) -> Result<bool, ProcessError> {
        Ok(true)
    }

    async fn is_active(&self, _process_id: &ProcessId) -> bool {
        false
    }

    async fn progress(&self, _process_id: &ProcessId) -> Option<ProcessProgress> {
        None
    }

    async fn wait(&self, _process_id: &ProcessId, _timeout: Duration) -> Result<ProcessRunStatus, ProcessError> {
        Ok(ProcessRunStatus::ExitedOk)
    }

    async fn graceful_shutdown(&self, _timeout: Duration) {}
}

async fn seed_streamer_stream_recording(gateway: &Gateway, ts_path: &std::path::Path) -> Recording {
    let streamer = Streamer::new(StreamerId::new(1), "ext-1", "nightly_dev");
    StreamerRepo::new(gateway).upsert(&streamer).await.expect("upsert streamer");

    let stream = Stream {
        id: StreamId::new(0),
        streamer_id: streamer.id,
        external_stream_id: Some("live-1".to_string()),
        title: "Hello".to_string(),
        category_name: None,
        language: None,
        started_at: Utc::now(),
        ended_at: None,
        episode_number: Some(1),
        recording_path: None,
    };
    let stream_id = StreamRepo::new(gateway).insert(&stream).await.expect("insert stream");

    let recording = Recording {
        id: RecordingId::new(0),
        stream_id,
        path: ts_path.display().to_string(),
        status: RecordingStatus::Processing,
        start_time: Utc::now(),
        end_time: None,
        duration_seconds: Some(120),
        file_size_bytes: None,
        error_message: None,
        failure_reason: None,
        error_at: None,
    };
    let recording_id = RecordingRepo::new(gateway).insert(&recording).await.expect("insert recording");
    Recording { id: recording_id, ..recording }
}

#[test]
fn static_chapter_source_first_cue_starts_at_zero_and_uses_title() {
    let cues = StaticChapterSource.cues("Hello", 1800);
    assert_eq!(cues[0].start_ms, 0);
    assert_eq!(cues[0].title, "Hello");
}

#[test]
fn static_chapter_source_covers_full_duration() {
    let cues = StaticChapterSource.cues("Hello", 1800);
    assert_eq!(cues.last().unwrap().end_ms, 1800 * 1000);
}

#[test]
fn static_chapter_source_caps_at_twenty_cues() {
    let cues = StaticChapterSource.cues("Marathon", 100 * SYNTHETIC_CUE_INTERVAL_SECS * 1000);
    assert!(cues.len() <= MAX_SYNTHETIC_CUES);
}

#[test]
fn static_chapter_source_zero_duration_still_yields_one_cue() {
    let cues = StaticChapterSource.cues("Hello", 0);
    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].title, "Hello");
}

#[test]
fn format_vtt_timestamp_formats_hh_mm_ss_mmm() {
    assert_eq!(format_vtt_timestamp(3_661_001), "01:01:01.001");
    assert_eq!(format_vtt_timestamp(0), "00:00:00.000");
}

#[test]
fn render_vtt_starts_with_webvtt_header() {
    let cues = vec![Cue { start_ms: 0, end_ms: 1000, title: "Hello".to_string() }];
    let vtt = render_vtt(&cues);
    assert!(vtt.starts_with("WEBVTT\n\n"));
    assert!(vtt.contains("Hello"));
}

#[test]
fn render_ffmetadata_emits_chapter_blocks() {
    let cues = vec![Cue { start_ms: 0, end_ms: 1000, title: "Hello".to_string() }];
    let body = render_ffmetadata(&cues);
    assert!(body.starts_with(";FFMETADATA1\n"));
    assert!(body.contains("[CHAPTER]"));
    assert!(body.contains("title=Hello"));
}

#[test]
fn escape_ffconcat_name_escapes_embedded_single_quotes() {
    assert_eq!(escape_ffconcat_name("o'clock_part001.ts"), "'o'\\''clock_part001.ts'");
}

#[test]
fn sibling_path_strips_ts_and_mp4_suffixes() {
    assert_eq!(sibling_path("/r/show - S1 - title.ts", ".vtt"), std::path::PathBuf::from("/r/show - S1 - title.vtt"));
    assert_eq!(sibling_path("/r/show - S1 - title.mp4", "-thumb.jpg"), std::path::PathBuf::from("/r/show - S1 - title-thumb.jpg"));
}

#[test]
fn looks_like_mp4_detects_ftyp_signature() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("clip.mp4");
    std::fs::write(&path, b"\x00\x00\x00\x18ftypisom").expect("write");
    assert!(looks_like_mp4(&path).expect("probe"));

    let not_mp4 = dir.path().join("clip.ts");
    std::fs::write(&not_mp4, b"not a container").expect("write");
    assert!(!looks_like_mp4(&not_mp4).expect("probe"));
}

#[tokio::test]
async fn segment_concatenation_fast_paths_a_lone_segment() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let segments_dir = dir.path().join("show - S1 - Hello_segments");
    std::fs::create_dir(&segments_dir).expect("mkdir");
    std::fs::write(segments_dir.join("show_part001.ts"), b"data").expect("write segment");

    let recording = seed_streamer_stream_recording(&gateway, &segments_dir).await;
    let handler = SegmentConcatenationHandler::new(gateway.clone(), ScriptedSupervisor::default());
    let payload = Payload::SegmentConcatenation { recording_id: recording.id };
    handler.execute(&payload, &|_pct| {}).await.expect("execute");

    let reloaded = RecordingRepo::new(&gateway).get(recording.id).await.expect("reload");
    assert!(reloaded.path.ends_with(".ts"));
    assert!(!segments_dir.exists());
}

#[tokio::test]
async fn segment_concatenation_joins_multiple_segments_via_muxer() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let segments_dir = dir.path().join("show - S1 - Hello_segments");
    std::fs::create_dir(&segments_dir).expect("mkdir");
    std::fs::write(segments_dir.join("show_part001.ts"), b"one").expect("write segment 1");
    std::fs::write(segments_dir.join("show_part002.ts"), b"two").expect("write segment 2");

    let recording = seed_streamer_stream_recording(&gateway, &segments_dir).await;
    let supervisor = ScriptedSupervisor::default();
    let handler = SegmentConcatenationHandler::new(gateway.clone(), supervisor.clone());
    let payload = Payload::SegmentConcatenation { recording_id: recording.id };
    handler.execute(&payload, &|_pct| {}).await.expect("execute");

    assert_eq!(supervisor.invocation_count(), 1);
    let reloaded = RecordingRepo::new(&gateway).get(recording.id).await.expect("reload");
    assert!(reloaded.path.ends_with(".ts"));
    assert!(!segments_dir.exists());

    let metadata = StreamMetadataRepo::new(&gateway).get(recording.stream_id).await.expect("metadata");
    assert!(metadata.segments_removed);
}

#[tokio::test]
async fn metadata_generation_writes_sidecars_and_marks_both_steps_complete() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let ts_path = dir.path().join("show - S1 - Hello.ts");
    std::fs::write(&ts_path, b"data").expect("write");

    let recording = seed_streamer_stream_recording(&gateway, &ts_path).await;
    let handler = MetadataGenerationHandler::new(gateway.clone(), StaticChapterSource);
    let payload = Payload::MetadataGeneration { recording_id: recording.id };
    handler.execute(&payload, &|_pct| {}).await.expect("execute");

    let metadata_state = ProcessingStateRepo::new(&gateway)
        .get(recording.id, StepName::Metadata)
        .await
        .expect("get")
        .expect("row exists");
    assert!(metadata_state.is_complete());
    let chapters_state = ProcessingStateRepo::new(&gateway)
        .get(recording.id, StepName::Chapters)
        .await
        .expect("get")
        .expect("row exists");
    assert!(chapters_state.is_complete());

    assert!(dir.path().join("show - S1 - Hello.vtt").exists());
    assert!(dir.path().join("show - S1 - Hello.chapters.ffmeta").exists());
    assert!(dir.path().join("show - S1 - Hello.nfo").exists());
}

#[tokio::test]
async fn mp4_validation_skips_if_already_completed() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let ts_path = dir.path().join("show - S1 - Hello.ts");
    std::fs::write(&ts_path, b"data").expect("write");
    let recording = seed_streamer_stream_recording(&gateway, &ts_path).await;

    let already_done = RecordingProcessingState {
        recording_id: recording.id,
        step: StepName::Mp4Validation,
        status: ProcessingStepStatus::Completed,
        attempts: 1,
        last_error: None,
        updated_at: Utc::now(),
    };
    ProcessingStateRepo::new(&gateway).upsert(&already_done).await.expect("seed completed");

    let handler = Mp4ValidationHandler::new(gateway.clone());
    let payload = Payload::Mp4Validation { recording_id: recording.id };
    handler.execute(&payload, &|_pct| {}).await.expect("execute is a no-op");
}

#[tokio::test]
async fn mp4_validation_fails_on_undersized_output() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let mp4_path = dir.path().join("show - S1 - Hello.mp4");
    std::fs::write(&mp4_path, b"tiny").expect("write");
    let recording = seed_streamer_stream_recording(&gateway, &mp4_path).await;

    let handler = Mp4ValidationHandler::new(gateway.clone());
    let payload = Payload::Mp4Validation { recording_id: recording.id };
    let result = handler.execute(&payload, &|_pct| {}).await;
    assert!(result.is_err());

    let state = ProcessingStateRepo::new(&gateway)
        .get(recording.id, StepName::Mp4Validation)
        .await
        .expect("get")
        .expect("row exists");
    assert_eq!(state.status, ProcessingStepStatus::Failed);
}

#[tokio::test]
async fn cleanup_handler_removes_ts_but_keeps_mp4() {
    if !db_tests_enabled() {
        return;
    }
    let gateway = test_gateway().await;
    let dir = TempDir::new().expect("tempdir");
    let mp4_path = dir.path().join("show - S1 - Hello.mp4");
    let ts_path = dir.path().join("show - S1 - Hello.ts");
    std::fs::write(&mp4_path, b"final").expect("write mp4");
    std::fs::write(&ts_path, b"raw").expect("write ts");
    let recording = seed_streamer_stream_recording(&gateway, &mp4_path).await;

    let handler = CleanupHandler::new(gateway.clone());
    let payload = Payload::Cleanup { recording_id: recording.id };
    handler.execute(&payload, &|_pct| {}).await.expect("execute");

    assert!(!ts_path.exists());
    assert!(mp4_path.exists());
}
