// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `StreamMetadata` (§3): side-car asset paths produced by the
//! post-processing pipeline for a single [`Stream`](super::Stream).

use serde::{Deserialize, Serialize};

use crate::ids::StreamId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMetadata {
    pub stream_id: StreamId,
    pub vtt_path: Option<String>,
    pub ffmpeg_chapters_path: Option<String>,
    pub nfo_path: Option<String>,
    pub thumbnail_path: Option<String>,
    pub segments_dir_path: Option<String>,
    /// Set once the raw `.ts` segment directory has been deleted by the
    /// cleanup step (§9 Open Question: only flipped if the directory
    /// actually existed at cleanup time).
    pub segments_removed: bool,
}

impl StreamMetadata {
    pub fn empty(stream_id: StreamId) -> Self {
        Self {
            stream_id,
            vtt_path: None,
            ffmpeg_chapters_path: None,
            nfo_path: None,
            thumbnail_path: None,
            segments_dir_path: None,
            segments_removed: false,
        }
    }
}

#[cfg(test)]
#[path = "stream_metadata_tests.rs"]
mod tests;
