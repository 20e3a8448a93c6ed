// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket Fan-Out transport (C11): the wire-level broadcast primitive
//! the engine's snapshot/delta composer (`streamvault_engine::fanout`)
//! drives. Per-connection send is best-effort — a failed send
//! disconnects that peer but never affects others (§4.10); per-peer
//! message order is preserved by routing every connection through its
//! own bounded mpsc channel.

mod fake;
mod ws;

pub use fake::FakeFanoutTransport;
pub use ws::TungsteniteFanout;

use async_trait::async_trait;

/// Sink the engine broadcasts pre-serialized JSON payloads to. Kept
/// deliberately thin — message framing and routing decisions live in
/// `streamvault_engine`, not here.
#[async_trait]
pub trait FanoutTransport: Clone + Send + Sync + 'static {
    /// Send `payload` to every currently connected peer. Never fails: a
    /// peer whose channel is closed or whose socket write errors is
    /// quietly dropped from the connection registry.
    async fn broadcast(&self, payload: String);

    /// Number of currently connected peers, for the periodic queue-stats
    /// snapshot payload.
    fn connection_count(&self) -> usize;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
