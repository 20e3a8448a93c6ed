// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Database Gateway (C3): the sole durable store. A pooled Postgres
//! connection threaded through every repository rather than reached via
//! a global — constructed once at daemon startup and held in
//! `AppContext` (§9 REDESIGN FLAG: no implicit singletons).

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;

use crate::error::StorageError;

const MAX_CONNECTIONS: u32 = 10;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);
/// Connections are recycled well under typical firewall/load-balancer
/// idle-kill windows (§4.2: "30 minute connection recycle").
const MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);
const IDLE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

#[derive(Clone)]
pub struct Gateway {
    pool: PgPool,
}

impl Gateway {
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let options: PgConnectOptions = database_url.parse::<PgConnectOptions>()?.application_name("streamvault");

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .max_lifetime(MAX_LIFETIME)
            .idle_timeout(IDLE_TIMEOUT)
            // Pre-ping: a dead connection handed back from the pool is
            // replaced before the caller ever sees it (§4.2).
            .test_before_acquire(true)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Readiness probe for the operator control socket's `Health` query
    /// (§6): round-trips a trivial query rather than inspecting pool
    /// state, since a pool can report idle connections while Postgres
    /// itself is unreachable.
    pub async fn is_reachable(&self) -> bool {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
#[path = "gateway_tests.rs"]
mod tests;
