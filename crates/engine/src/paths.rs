// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! On-disk layout (§6): `<recordings_root>/<streamer>/Season YYYY-MM/
//! <streamer> - SYYYYMMEnn - <title>.{ts,mp4,vtt,chapters.ffmeta,nfo}`
//! plus a `-thumb.jpg` poster and, for segmented captures, a
//! `..._segments/` directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use streamvault_core::{preferred_extension, sanitize_component};

/// All sidecar paths for one recording, derived once at start time and
/// reused unchanged through every post-processing step (§4.7).
#[derive(Debug, Clone)]
pub struct RecordingPaths {
    dir: PathBuf,
    base: String,
}

impl RecordingPaths {
    /// `root/<streamer>/Season YYYY-MM/<streamer> - S{YYYYMM}E{episode:02} - {title}`
    pub fn build(
        root: &Path,
        streamer_username: &str,
        title: &str,
        started_at: DateTime<Utc>,
        episode: i32,
    ) -> Self {
        let streamer = sanitize_component(streamer_username);
        let title = sanitize_component(title);
        let season_dir = format!("Season {:04}-{:02}", started_at.year(), started_at.month());
        let yyyymm = format!("{:04}{:02}", started_at.year(), started_at.month());

        let dir = root.join(&streamer).join(season_dir);
        let base = format!("{streamer} - S{yyyymm}E{episode:02} - {title}");
        Self { dir, base }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ts_path(&self) -> PathBuf {
        self.dir.join(format!("{}.ts", self.base))
    }

    pub fn mp4_path(&self) -> PathBuf {
        self.dir.join(format!("{}.mp4", self.base))
    }

    pub fn vtt_path(&self) -> PathBuf {
        self.dir.join(format!("{}.vtt", self.base))
    }

    pub fn ffmeta_path(&self) -> PathBuf {
        self.dir.join(format!("{}.chapters.ffmeta", self.base))
    }

    pub fn nfo_path(&self) -> PathBuf {
        self.dir.join(format!("{}.nfo", self.base))
    }

    pub fn thumb_path(&self) -> PathBuf {
        self.dir.join(format!("{}-thumb.jpg", self.base))
    }

    pub fn segments_dir(&self) -> PathBuf {
        self.dir.join(format!("{}_segments", self.base))
    }

    /// The final video file, resolving the §4.7 tie-break: prefer `.mp4`
    /// over `.ts` when both are present on disk.
    pub fn resolve_video(&self) -> PathBuf {
        let mut candidates = Vec::new();
        if self.mp4_path().exists() {
            candidates.push("mp4");
        }
        if self.ts_path().exists() {
            candidates.push("ts");
        }
        match preferred_extension(&candidates) {
            Some("mp4") => self.mp4_path(),
            Some("ts") => self.ts_path(),
            _ => self.mp4_path(),
        }
    }
}

/// Numeric `*_partNNN.ts` ordering (§9 REDESIGN FLAG: enforce numeric
/// order at scan time, never lexicographic).
pub fn segment_part_number(file_name: &str) -> Option<u32> {
    let stem = file_name.strip_suffix(".ts")?;
    let idx = stem.rfind("_part")?;
    stem[idx + 5..].parse().ok()
}

/// List segment files under `segments_dir`, sorted by numeric part
/// number (not filename).
pub fn list_segments_numeric(segments_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries: Vec<(u32, PathBuf)> = Vec::new();
    for entry in std::fs::read_dir(segments_dir)? {
        let entry = entry?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(n) = segment_part_number(name) {
            entries.push((n, path));
        }
    }
    entries.sort_by_key(|(n, _)| *n);
    Ok(entries.into_iter().map(|(_, p)| p).collect())
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;
