// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`StreamMetadata`] side-car asset paths.

use sqlx::Row;
use streamvault_core::{StreamId, StreamMetadata};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn from_row(row: &sqlx::postgres::PgRow) -> Result<StreamMetadata, StorageError> {
    Ok(StreamMetadata {
        stream_id: StreamId::new(row.try_get("stream_id")?),
        vtt_path: row.try_get("vtt_path")?,
        ffmpeg_chapters_path: row.try_get("ffmpeg_chapters_path")?,
        nfo_path: row.try_get("nfo_path")?,
        thumbnail_path: row.try_get("thumbnail_path")?,
        segments_dir_path: row.try_get("segments_dir_path")?,
        segments_removed: row.try_get("segments_removed")?,
    })
}

pub struct StreamMetadataRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> StreamMetadataRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, stream_id: StreamId) -> Result<StreamMetadata, StorageError> {
        let row = sqlx::query("SELECT * FROM stream_metadata WHERE stream_id = $1")
            .bind(stream_id.get())
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn upsert(&self, metadata: &StreamMetadata) -> Result<(), StorageError> {
        with_retry("stream_metadata.upsert", || async {
            sqlx::query(
                r#"
                INSERT INTO stream_metadata (stream_id, vtt_path, ffmpeg_chapters_path, nfo_path,
                                             thumbnail_path, segments_dir_path, segments_removed)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ON CONFLICT (stream_id) DO UPDATE SET
                    vtt_path = EXCLUDED.vtt_path,
                    ffmpeg_chapters_path = EXCLUDED.ffmpeg_chapters_path,
                    nfo_path = EXCLUDED.nfo_path,
                    thumbnail_path = EXCLUDED.thumbnail_path,
                    segments_dir_path = EXCLUDED.segments_dir_path,
                    segments_removed = EXCLUDED.segments_removed
                "#,
            )
            .bind(metadata.stream_id.get())
            .bind(&metadata.vtt_path)
            .bind(&metadata.ffmpeg_chapters_path)
            .bind(&metadata.nfo_path)
            .bind(&metadata.thumbnail_path)
            .bind(&metadata.segments_dir_path)
            .bind(metadata.segments_removed)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "stream_metadata_tests.rs"]
mod tests;
