// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`Streamer`].

use sqlx::Row;
use streamvault_core::{Streamer, StreamerId};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn from_row(row: &sqlx::postgres::PgRow) -> Result<Streamer, StorageError> {
    Ok(Streamer {
        id: StreamerId::new(row.try_get("id")?),
        external_id: row.try_get("external_id")?,
        username: row.try_get("username")?,
        display_name: row.try_get("display_name")?,
        category_name: row.try_get("category_name")?,
        is_live: row.try_get("is_live")?,
        profile_image_url: row.try_get("profile_image_url")?,
        profile_image_archival_url: row.try_get("profile_image_archival_url")?,
        banner_url: row.try_get("banner_url")?,
        is_test_data: row.try_get("is_test_data")?,
    })
}

pub struct StreamerRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> StreamerRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    pub async fn get(&self, id: StreamerId) -> Result<Streamer, StorageError> {
        let row = sqlx::query("SELECT * FROM streamers WHERE id = $1")
            .bind(id.get())
            .fetch_optional(self.gateway.pool())
            .await?
            .ok_or(StorageError::NotFound)?;
        from_row(&row)
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Streamer>, StorageError> {
        let row = sqlx::query("SELECT * FROM streamers WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(from_row).transpose()
    }

    pub async fn list_all(&self) -> Result<Vec<Streamer>, StorageError> {
        let rows = sqlx::query("SELECT * FROM streamers ORDER BY username")
            .fetch_all(self.gateway.pool())
            .await?;
        rows.iter().map(from_row).collect()
    }

    pub async fn upsert(&self, streamer: &Streamer) -> Result<(), StorageError> {
        with_retry("streamers.upsert", || async {
            sqlx::query(
                r#"
                INSERT INTO streamers (id, external_id, username, display_name, category_name,
                                       is_live, profile_image_url, profile_image_archival_url,
                                       banner_url, is_test_data)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                ON CONFLICT (id) DO UPDATE SET
                    username = EXCLUDED.username,
                    display_name = EXCLUDED.display_name,
                    category_name = EXCLUDED.category_name,
                    is_live = EXCLUDED.is_live,
                    profile_image_url = EXCLUDED.profile_image_url,
                    profile_image_archival_url = EXCLUDED.profile_image_archival_url,
                    banner_url = EXCLUDED.banner_url
                "#,
            )
            .bind(streamer.id.get())
            .bind(&streamer.external_id)
            .bind(&streamer.username)
            .bind(&streamer.display_name)
            .bind(&streamer.category_name)
            .bind(streamer.is_live)
            .bind(&streamer.profile_image_url)
            .bind(&streamer.profile_image_archival_url)
            .bind(&streamer.banner_url)
            .bind(streamer.is_test_data)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn set_is_live(&self, id: StreamerId, is_live: bool) -> Result<(), StorageError> {
        with_retry("streamers.set_is_live", || async {
            sqlx::query("UPDATE streamers SET is_live = $1 WHERE id = $2")
                .bind(is_live)
                .bind(id.get())
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "streamers_tests.rs"]
mod tests;
