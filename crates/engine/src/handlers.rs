// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Post-Processing Handlers (C9, §4.8): the DAG of
//! `[segment_concatenation]? -> [metadata_generation] -> [mp4_remux] ->
//! [mp4_validation] -> [thumbnail_generation] -> [cleanup]`. Every
//! handler re-reads its step's `RecordingProcessingState` row before
//! doing any work and skips if already `completed` (§4.9 idempotency
//! gate, P6).
//!
//! Handlers derive every sidecar path from the recording's current
//! on-disk path rather than re-deriving the full [`crate::paths::RecordingPaths`]
//! (streamer/season/episode) from scratch, since by the time a handler
//! runs that base name is already fixed on disk.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use streamvault_adapters::{ProcessId, ProcessRunStatus, ProcessSupervisor};
use streamvault_core::{
    Payload, ProcessingStepStatus, Recording, RecordingId, RecordingProcessingState, StepName, StreamMetadata,
};
use streamvault_storage::{Gateway, ProcessingStateRepo, RecordingRepo, StreamMetadataRepo, StreamRepo, StreamerRepo};

use crate::error::EngineError;
use crate::paths::list_segments_numeric;
use crate::worker_pool::{ProgressFn, TaskHandler};

const CONCAT_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const REMUX_TIMEOUT: Duration = Duration::from_secs(10 * 60);
const MIN_OUTPUT_BYTES: u64 = 1024;
/// Synthetic chapter fallback (§4.8): a cue every 10 minutes, capped at
/// 20 total cues.
const SYNTHETIC_CUE_INTERVAL_SECS: i64 = 600;
const MAX_SYNTHETIC_CUES: usize = 20;

fn strip_known_video_suffix(path: &str) -> &str {
    path.strip_suffix(".ts").or_else(|| path.strip_suffix(".mp4")).unwrap_or(path)
}

fn sibling_path(recording_path: &str, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}{suffix}", strip_known_video_suffix(recording_path)))
}

async fn require_recording(gateway: &Gateway, recording_id: RecordingId) -> Result<Recording, EngineError> {
    RecordingRepo::new(gateway)
        .get(recording_id)
        .await
        .map_err(|e| e.into())
}

/// Returns `true` if the step is already `completed` (caller should skip).
async fn gate(gateway: &Gateway, recording_id: RecordingId, step: StepName) -> Result<bool, EngineError> {
    let state = ProcessingStateRepo::new(gateway).get(recording_id, step).await?;
    Ok(state.map(|s| s.is_complete()).unwrap_or(false))
}

async fn mark_running(gateway: &Gateway, recording_id: RecordingId, step: StepName) -> Result<(), EngineError> {
    let existing = ProcessingStateRepo::new(gateway).get(recording_id, step).await?;
    let mut state = existing.unwrap_or_else(|| RecordingProcessingState::pending(recording_id, step, Utc::now()));
    state.status = ProcessingStepStatus::Running;
    state.updated_at = Utc::now();
    ProcessingStateRepo::new(gateway).upsert(&state).await?;
    Ok(())
}

async fn mark_terminal(
    gateway: &Gateway,
    recording_id: RecordingId,
    step: StepName,
    status: ProcessingStepStatus,
    error: Option<String>,
) -> Result<(), EngineError> {
    let mut state = ProcessingStateRepo::new(gateway)
        .get(recording_id, step)
        .await?
        .unwrap_or_else(|| RecordingProcessingState::pending(recording_id, step, Utc::now()));
    state.status = status;
    state.last_error = error;
    if state.status == ProcessingStepStatus::Failed {
        state.attempts += 1;
    }
    state.updated_at = Utc::now();
    ProcessingStateRepo::new(gateway).upsert(&state).await?;
    Ok(())
}

pub(crate) fn recording_id_of(payload: &Payload) -> Result<RecordingId, EngineError> {
    match payload {
        Payload::SegmentConcatenation { recording_id }
        | Payload::MetadataGeneration { recording_id }
        | Payload::Mp4Remux { recording_id }
        | Payload::Mp4Validation { recording_id }
        | Payload::ThumbnailGeneration { recording_id }
        | Payload::Cleanup { recording_id } => Ok(*recording_id),
        other => Err(EngineError::InvalidDag(format!("handler invoked with non-recording payload: {other:?}"))),
    }
}

fn escape_ffconcat_name(name: &str) -> String {
    format!("'{}'", name.replace('\'', "'\\''"))
}

/// A chapter cue used to build both the WebVTT and FFmpeg chapter
/// sidecars (§4.8 Metadata).
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    pub start_ms: i64,
    pub end_ms: i64,
    pub title: String,
}

/// Source of in-stream chapter cues (§9/SPEC_FULL §7: a trait method so
/// a real category/title-change event source can be plugged in later
/// without the DAG step changing shape). The only production
/// implementation today is [`StaticChapterSource`], which synthesizes
/// cues at fixed intervals in the absence of real events.
pub trait ChapterSource: Send + Sync {
    fn cues(&self, title: &str, duration_seconds: i64) -> Vec<Cue>;
}

/// Synthesizes a cue every 10 minutes up to 20 cues total (§4.8). The
/// first cue always starts at `0` and is titled with the stream title so
/// S1's "VTT has at least one cue titled Hello" holds even for very
/// short recordings.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticChapterSource;

impl ChapterSource for StaticChapterSource {
    fn cues(&self, title: &str, duration_seconds: i64) -> Vec<Cue> {
        let duration_ms = duration_seconds.max(0) * 1000;
        let interval_ms = SYNTHETIC_CUE_INTERVAL_SECS * 1000;
        let mut cues = vec![];
        let mut start = 0i64;
        let mut index = 1;
        loop {
            let end = if start + interval_ms < duration_ms { start + interval_ms } else { duration_ms.max(start + 1) };
            let cue_title = if index == 1 { title.to_string() } else { format!("{title} (part {index})") };
            cues.push(Cue {
                start_ms: start,
                end_ms: end,
                title: cue_title,
            });
            if end >= duration_ms || cues.len() >= MAX_SYNTHETIC_CUES {
                break;
            }
            start = end;
            index += 1;
        }
        cues
    }
}

fn format_vtt_timestamp(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let millis = ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

fn render_vtt(cues: &[Cue]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for cue in cues {
        out.push_str(&format!(
            "{} --> {}\n{}\n\n",
            format_vtt_timestamp(cue.start_ms),
            format_vtt_timestamp(cue.end_ms),
            cue.title
        ));
    }
    out
}

fn render_ffmetadata(cues: &[Cue]) -> String {
    let mut out = String::from(";FFMETADATA1\n");
    for cue in cues {
        out.push_str("[CHAPTER]\n");
        out.push_str("TIMEBASE=1/1000\n");
        out.push_str(&format!("START={}\n", cue.start_ms));
        out.push_str(&format!("END={}\n", cue.end_ms));
        out.push_str(&format!("title={}\n", cue.title));
    }
    out
}

fn render_nfo(streamer: &str, title: &str, season_yyyymm: i32, episode: i32) -> String {
    format!(
        "<episodedetails>\n  <title>{title}</title>\n  <showtitle>{streamer}</showtitle>\n  <season>{season_yyyymm}</season>\n  <episode>{episode}</episode>\n</episodedetails>\n"
    )
}

/// `[segment_concatenation]`: joins numerically-ordered `*_partNNN.ts`
/// segments into the canonical TS path, or fast-path renames a lone
/// segment (§4.8, §9 Open Question 3). Not one of the six durable steps
/// in [`StepName`] — idempotency here is gated on whether
/// `Recording.path` still points at a `_segments` directory.
pub struct SegmentConcatenationHandler<P: ProcessSupervisor> {
    gateway: Gateway,
    supervisor: P,
}

impl<P: ProcessSupervisor> SegmentConcatenationHandler<P> {
    pub fn new(gateway: Gateway, supervisor: P) -> Self {
        Self { gateway, supervisor }
    }
}

#[async_trait]
impl<P: ProcessSupervisor> TaskHandler for SegmentConcatenationHandler<P> {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        let recording = require_recording(&self.gateway, recording_id).await?;
        let segments_dir = PathBuf::from(&recording.path);
        if !segments_dir.is_dir() {
            progress(100);
            return Ok(());
        }

        let segments = list_segments_numeric(&segments_dir)?;
        if segments.is_empty() {
            return Err(EngineError::InvalidDag(format!("no segments found in {}", segments_dir.display())));
        }

        let canonical_ts = segments_dir
            .parent()
            .map(|p| p.join(format!("{}.ts", base_name_for_segments_dir(&segments_dir))))
            .ok_or_else(|| EngineError::InvalidDag("segments directory has no parent".into()))?;

        if segments.len() == 1 {
            std::fs::rename(&segments[0], &canonical_ts)?;
        } else {
            let list_path = segments_dir.join("concat_list.txt");
            let mut list_body = String::new();
            for segment in &segments {
                let Some(name) = segment.file_name().and_then(|n| n.to_str()) else {
                    continue;
                };
                list_body.push_str(&format!("file {}\n", escape_ffconcat_name(name)));
            }
            std::fs::write(&list_path, list_body)?;

            let process_id = ProcessId::for_stream(recording.stream_id.get());
            let args = vec![
                "-f".to_string(),
                "concat".to_string(),
                "-safe".to_string(),
                "0".to_string(),
                "-i".to_string(),
                list_path.display().to_string(),
                "-c".to_string(),
                "copy".to_string(),
                "-y".to_string(),
                canonical_ts.display().to_string(),
            ];
            self.supervisor.start_remux(&process_id, &args).await?;
            let status = self.supervisor.wait(&process_id, CONCAT_TIMEOUT).await?;
            if status != ProcessRunStatus::ExitedOk {
                return Err(EngineError::OperatorVisible {
                    context: "segment_concatenation".to_string(),
                    message: format!("concat muxer exited with status {status:?}"),
                });
            }
            let _ = std::fs::remove_file(&list_path);
            for segment in &segments {
                let _ = std::fs::remove_file(segment);
            }
        }

        if std::fs::read_dir(&segments_dir).map(|mut it| it.next().is_none()).unwrap_or(false) {
            let _ = std::fs::remove_dir(&segments_dir);
        }

        let canonical_ts_str = canonical_ts.display().to_string();
        RecordingRepo::new(&self.gateway).update_path(recording.id, &canonical_ts_str).await?;

        let mut metadata = StreamMetadataRepo::new(&self.gateway)
            .get(recording.stream_id)
            .await
            .unwrap_or_else(|_| StreamMetadata::empty(recording.stream_id));
        metadata.segments_dir_path = Some(segments_dir.display().to_string());
        metadata.segments_removed = true;
        StreamMetadataRepo::new(&self.gateway).upsert(&metadata).await?;

        progress(100);
        Ok(())
    }
}

fn base_name_for_segments_dir(segments_dir: &Path) -> String {
    segments_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.strip_suffix("_segments").unwrap_or(n).to_string())
        .unwrap_or_else(|| "recording".to_string())
}

/// `[metadata_generation]`: writes the VTT, FFmpeg-chapter, and NFO
/// sidecars. Covers both the `metadata` and `chapters` durable steps
/// (§4.8 groups them under one handler; §3 tracks them as separate
/// status fields).
pub struct MetadataGenerationHandler<Ch: ChapterSource> {
    gateway: Gateway,
    chapter_source: Ch,
}

impl<Ch: ChapterSource> MetadataGenerationHandler<Ch> {
    pub fn new(gateway: Gateway, chapter_source: Ch) -> Self {
        Self { gateway, chapter_source }
    }
}

#[async_trait]
impl<Ch: ChapterSource + 'static> TaskHandler for MetadataGenerationHandler<Ch> {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        if gate(&self.gateway, recording_id, StepName::Metadata).await? && gate(&self.gateway, recording_id, StepName::Chapters).await? {
            progress(100);
            return Ok(());
        }
        mark_running(&self.gateway, recording_id, StepName::Metadata).await?;
        mark_running(&self.gateway, recording_id, StepName::Chapters).await?;

        let run = async {
            let recording = require_recording(&self.gateway, recording_id).await?;
            let stream = StreamRepo::new(&self.gateway).get(recording.stream_id).await?;
            let streamer = StreamerRepo::new(&self.gateway).get(stream.streamer_id).await?;
            let episode = stream.episode_number.unwrap_or(1);
            let season_yyyymm = stream.started_at.format("%Y%m").to_string().parse::<i32>().unwrap_or(0);

            let cues = self.chapter_source.cues(&stream.title, recording.duration_seconds.unwrap_or(0));
            let vtt_path = sibling_path(&recording.path, ".vtt");
            let ffmeta_path = sibling_path(&recording.path, ".chapters.ffmeta");
            let nfo_path = sibling_path(&recording.path, ".nfo");

            std::fs::write(&vtt_path, render_vtt(&cues))?;
            std::fs::write(&ffmeta_path, render_ffmetadata(&cues))?;
            std::fs::write(&nfo_path, render_nfo(&streamer.display_name, &stream.title, season_yyyymm, episode))?;

            let mut metadata = StreamMetadataRepo::new(&self.gateway)
                .get(stream.id)
                .await
                .unwrap_or_else(|_| StreamMetadata::empty(stream.id));
            metadata.vtt_path = Some(vtt_path.display().to_string());
            metadata.ffmpeg_chapters_path = Some(ffmeta_path.display().to_string());
            metadata.nfo_path = Some(nfo_path.display().to_string());
            StreamMetadataRepo::new(&self.gateway).upsert(&metadata).await?;
            Ok::<(), EngineError>(())
        }
        .await;

        match run {
            Ok(()) => {
                mark_terminal(&self.gateway, recording_id, StepName::Metadata, ProcessingStepStatus::Completed, None)
                    .await?;
                mark_terminal(&self.gateway, recording_id, StepName::Chapters, ProcessingStepStatus::Completed, None)
                    .await?;
                progress(100);
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                mark_terminal(
                    &self.gateway,
                    recording_id,
                    StepName::Metadata,
                    ProcessingStepStatus::Failed,
                    Some(message.clone()),
                )
                .await?;
                mark_terminal(&self.gateway, recording_id, StepName::Chapters, ProcessingStepStatus::Failed, Some(message))
                    .await?;
                Err(err)
            }
        }
    }
}

/// `[mp4_remux]`: stream-copy TS -> MP4 with `-bsf:a aac_adtstoasc` and
/// `-movflags +faststart` (§4.8).
pub struct Mp4RemuxHandler<P: ProcessSupervisor> {
    gateway: Gateway,
    supervisor: P,
}

impl<P: ProcessSupervisor> Mp4RemuxHandler<P> {
    pub fn new(gateway: Gateway, supervisor: P) -> Self {
        Self { gateway, supervisor }
    }
}

#[async_trait]
impl<P: ProcessSupervisor> TaskHandler for Mp4RemuxHandler<P> {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        if gate(&self.gateway, recording_id, StepName::Mp4Remux).await? {
            progress(100);
            return Ok(());
        }
        mark_running(&self.gateway, recording_id, StepName::Mp4Remux).await?;

        let run = async {
            let recording = require_recording(&self.gateway, recording_id).await?;
            let mp4_path = sibling_path(&recording.path, ".mp4");
            let process_id = ProcessId::for_stream(recording.stream_id.get());
            let args = vec![
                "-i".to_string(),
                recording.path.clone(),
                "-c".to_string(),
                "copy".to_string(),
                "-bsf:a".to_string(),
                "aac_adtstoasc".to_string(),
                "-movflags".to_string(),
                "+faststart".to_string(),
                "-y".to_string(),
                mp4_path.display().to_string(),
            ];
            self.supervisor.start_remux(&process_id, &args).await?;
            let status = self.supervisor.wait(&process_id, REMUX_TIMEOUT).await?;
            if status != ProcessRunStatus::ExitedOk {
                return Err(EngineError::OperatorVisible {
                    context: "mp4_remux".to_string(),
                    message: format!("muxer exited with status {status:?}"),
                });
            }

            let mp4_path_str = mp4_path.display().to_string();
            RecordingRepo::new(&self.gateway).update_path(recording.id, &mp4_path_str).await?;
            Ok::<(), EngineError>(())
        }
        .await;

        finish_step(&self.gateway, recording_id, StepName::Mp4Remux, run, progress).await
    }
}

/// `[mp4_validation]`: file exists, size >= 1 KiB, and looks like an MP4
/// container (`ftyp` box signature at offset 4) — a lightweight stand-in
/// for the full muxer probe contract (§6).
pub struct Mp4ValidationHandler {
    gateway: Gateway,
}

impl Mp4ValidationHandler {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

fn looks_like_mp4(path: &Path) -> std::io::Result<bool> {
    let bytes = std::fs::read(path)?;
    Ok(bytes.len() >= 8 && &bytes[4..8] == b"ftyp")
}

#[async_trait]
impl TaskHandler for Mp4ValidationHandler {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        if gate(&self.gateway, recording_id, StepName::Mp4Validation).await? {
            progress(100);
            return Ok(());
        }
        mark_running(&self.gateway, recording_id, StepName::Mp4Validation).await?;

        let run = async {
            let recording = require_recording(&self.gateway, recording_id).await?;
            let path = Path::new(&recording.path);
            let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
            if size < MIN_OUTPUT_BYTES {
                return Err(EngineError::OperatorVisible {
                    context: "mp4_validation".to_string(),
                    message: format!("output {} is only {size} bytes", path.display()),
                });
            }
            if !looks_like_mp4(path)? {
                return Err(EngineError::OperatorVisible {
                    context: "mp4_validation".to_string(),
                    message: format!("{} does not look like an MP4 container", path.display()),
                });
            }
            Ok::<(), EngineError>(())
        }
        .await;

        finish_step(&self.gateway, recording_id, StepName::Mp4Validation, run, progress).await
    }
}

/// `[thumbnail_generation]`: prefers an external `<base>-thumb.jpg`
/// poster; otherwise extracts a frame at 10% of duration or 60s,
/// whichever is smaller, with one retry at 50% duration if the first
/// attempt produced a suspiciously small (likely black) frame (§4.8).
pub struct ThumbnailGenerationHandler<P: ProcessSupervisor> {
    gateway: Gateway,
    supervisor: P,
}

impl<P: ProcessSupervisor> ThumbnailGenerationHandler<P> {
    pub fn new(gateway: Gateway, supervisor: P) -> Self {
        Self { gateway, supervisor }
    }

    async fn extract_frame(&self, recording: &Recording, offset_secs: f64, thumb_path: &Path) -> Result<(), EngineError> {
        let process_id = ProcessId::for_stream(recording.stream_id.get());
        let args = vec![
            "-ss".to_string(),
            format!("{offset_secs:.2}"),
            "-i".to_string(),
            recording.path.clone(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-y".to_string(),
            thumb_path.display().to_string(),
        ];
        self.supervisor.start_remux(&process_id, &args).await?;
        let status = self.supervisor.wait(&process_id, Duration::from_secs(30)).await?;
        if status != ProcessRunStatus::ExitedOk {
            return Err(EngineError::OperatorVisible {
                context: "thumbnail_generation".to_string(),
                message: format!("frame extraction exited with status {status:?}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<P: ProcessSupervisor> TaskHandler for ThumbnailGenerationHandler<P> {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        if gate(&self.gateway, recording_id, StepName::Thumbnail).await? {
            progress(100);
            return Ok(());
        }
        mark_running(&self.gateway, recording_id, StepName::Thumbnail).await?;

        let run = async {
            let recording = require_recording(&self.gateway, recording_id).await?;
            let poster_path = sibling_path(&recording.path, "-thumb.jpg");
            if !poster_path.exists() {
                let duration = recording.duration_seconds.unwrap_or(0) as f64;
                let offset = (duration * 0.1).min(60.0).max(0.0);
                self.extract_frame(&recording, offset, &poster_path).await?;

                let size = std::fs::metadata(&poster_path).map(|m| m.len()).unwrap_or(0);
                if size < MIN_OUTPUT_BYTES {
                    let fallback_offset = (duration * 0.5).max(0.0);
                    self.extract_frame(&recording, fallback_offset, &poster_path).await?;
                }
            }

            let mut metadata = StreamMetadataRepo::new(&self.gateway)
                .get(recording.stream_id)
                .await
                .unwrap_or_else(|_| StreamMetadata::empty(recording.stream_id));
            metadata.thumbnail_path = Some(poster_path.display().to_string());
            StreamMetadataRepo::new(&self.gateway).upsert(&metadata).await?;
            Ok::<(), EngineError>(())
        }
        .await;

        finish_step(&self.gateway, recording_id, StepName::Thumbnail, run, progress).await
    }
}

/// `[cleanup]`: deletes the TS input and, if present, the segments
/// directory. Never deletes the MP4 or sidecars (§4.8).
pub struct CleanupHandler {
    gateway: Gateway,
}

impl CleanupHandler {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl TaskHandler for CleanupHandler {
    async fn execute(&self, payload: &Payload, progress: &ProgressFn<'_>) -> Result<(), EngineError> {
        let recording_id = recording_id_of(payload)?;
        if gate(&self.gateway, recording_id, StepName::Cleanup).await? {
            progress(100);
            return Ok(());
        }
        mark_running(&self.gateway, recording_id, StepName::Cleanup).await?;

        let run = async {
            let mut recording = require_recording(&self.gateway, recording_id).await?;
            let ts_path = sibling_path(&recording.path, ".ts");
            if ts_path.exists() {
                std::fs::remove_file(&ts_path)?;
            }

            if let Ok(metadata) = StreamMetadataRepo::new(&self.gateway).get(recording.stream_id).await {
                if let Some(dir) = metadata.segments_dir_path.as_deref() {
                    let dir = Path::new(dir);
                    if dir.exists() {
                        std::fs::remove_dir_all(dir)?;
                    }
                }
            }

            // Cleanup is the last DAG step: once it succeeds the archive is
            // final, so this is where `Recording.status` settles for good
            // (it never leaves `Recording`/`Stopped`/`Failed` otherwise).
            let mp4_path = sibling_path(&recording.path, ".mp4");
            if let Ok(meta) = std::fs::metadata(&mp4_path) {
                recording.file_size_bytes = Some(meta.len() as i64);
            }
            recording.status = streamvault_core::RecordingStatus::Completed;
            RecordingRepo::new(&self.gateway).update_status(&recording).await?;
            Ok::<(), EngineError>(())
        }
        .await;

        finish_step(&self.gateway, recording_id, StepName::Cleanup, run, progress).await
    }
}

async fn finish_step(
    gateway: &Gateway,
    recording_id: RecordingId,
    step: StepName,
    result: Result<(), EngineError>,
    progress: &ProgressFn<'_>,
) -> Result<(), EngineError> {
    match result {
        Ok(()) => {
            mark_terminal(gateway, recording_id, step, ProcessingStepStatus::Completed, None).await?;
            progress(100);
            Ok(())
        }
        Err(err) => {
            mark_terminal(gateway, recording_id, step, ProcessingStepStatus::Failed, Some(err.to_string())).await?;
            Err(err)
        }
    }
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
