// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory [`FanoutTransport`] double for engine unit tests.
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::FanoutTransport;

#[derive(Clone, Default)]
pub struct FakeFanoutTransport {
    sent: Arc<Mutex<Vec<String>>>,
    connections: Arc<Mutex<usize>>,
}

impl FakeFanoutTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }

    pub fn set_connection_count(&self, n: usize) {
        *self.connections.lock() = n;
    }
}

#[async_trait]
impl FanoutTransport for FakeFanoutTransport {
    async fn broadcast(&self, payload: String) {
        self.sent.lock().push(payload);
    }

    fn connection_count(&self) -> usize {
        *self.connections.lock()
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
