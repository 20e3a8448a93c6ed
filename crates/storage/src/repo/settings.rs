// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Repository for [`GlobalSettings`] and [`StreamerRecordingSettings`].
//! `GlobalSettings` is a single row (`id = TRUE`); the core never invents
//! a value here, only reads what the operator configured (§3).

use sqlx::Row;
use streamvault_core::{GlobalSettings, ProxySettings, StreamerId, StreamerRecordingSettings};

use crate::error::StorageError;
use crate::retry::with_retry;
use crate::Gateway;

fn global_from_row(row: &sqlx::postgres::PgRow) -> Result<GlobalSettings, StorageError> {
    Ok(GlobalSettings {
        encryption_key: row.try_get("encryption_key")?,
        proxy: ProxySettings {
            http_proxy: row.try_get("http_proxy")?,
            https_proxy: row.try_get("https_proxy")?,
        },
        default_quality: row.try_get("default_quality")?,
        concurrent_worker_limit: row.try_get::<i32, _>("concurrent_worker_limit")? as u32,
    })
}

fn streamer_from_row(row: &sqlx::postgres::PgRow) -> Result<StreamerRecordingSettings, StorageError> {
    Ok(StreamerRecordingSettings {
        streamer_id: StreamerId::new(row.try_get("streamer_id")?),
        quality: row.try_get("quality")?,
        auto_record: row.try_get("auto_record")?,
        priority: row.try_get("priority")?,
    })
}

pub struct SettingsRepo<'a> {
    gateway: &'a Gateway,
}

impl<'a> SettingsRepo<'a> {
    pub fn new(gateway: &'a Gateway) -> Self {
        Self { gateway }
    }

    /// The single `global_settings` row. `None` means the daemon has
    /// never run its first-use bootstrap (see [`Self::bootstrap`]).
    pub async fn get_global(&self) -> Result<Option<GlobalSettings>, StorageError> {
        let row = sqlx::query("SELECT * FROM global_settings WHERE id = TRUE")
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(global_from_row).transpose()
    }

    /// Create the single `global_settings` row on first use, generating a
    /// fresh `encryption_key` if one wasn't supplied (§3: "auto-generated
    /// on first use"). A no-op if the row already exists.
    pub async fn bootstrap(&self, encryption_key: &str, default_quality: &str) -> Result<(), StorageError> {
        with_retry("settings.bootstrap", || async {
            sqlx::query(
                r#"
                INSERT INTO global_settings (id, encryption_key, default_quality)
                VALUES (TRUE, $1, $2)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(encryption_key)
            .bind(default_quality)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }

    pub async fn update_proxy(&self, proxy: &ProxySettings) -> Result<(), StorageError> {
        with_retry("settings.update_proxy", || async {
            sqlx::query("UPDATE global_settings SET http_proxy = $1, https_proxy = $2 WHERE id = TRUE")
                .bind(&proxy.http_proxy)
                .bind(&proxy.https_proxy)
                .execute(self.gateway.pool())
                .await?;
            Ok(())
        })
        .await
    }

    pub async fn get_streamer(
        &self,
        streamer_id: StreamerId,
    ) -> Result<Option<StreamerRecordingSettings>, StorageError> {
        let row = sqlx::query("SELECT * FROM streamer_recording_settings WHERE streamer_id = $1")
            .bind(streamer_id.get())
            .fetch_optional(self.gateway.pool())
            .await?;
        row.as_ref().map(streamer_from_row).transpose()
    }

    pub async fn upsert_streamer(&self, settings: &StreamerRecordingSettings) -> Result<(), StorageError> {
        with_retry("settings.upsert_streamer", || async {
            sqlx::query(
                r#"
                INSERT INTO streamer_recording_settings (streamer_id, quality, auto_record, priority)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (streamer_id) DO UPDATE SET
                    quality = EXCLUDED.quality,
                    auto_record = EXCLUDED.auto_record,
                    priority = EXCLUDED.priority
                "#,
            )
            .bind(settings.streamer_id.get())
            .bind(&settings.quality)
            .bind(settings.auto_record)
            .bind(settings.priority)
            .execute(self.gateway.pool())
            .await?;
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
