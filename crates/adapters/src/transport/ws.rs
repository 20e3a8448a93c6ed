// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Real [`FanoutTransport`] over `tokio-tungstenite`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use super::FanoutTransport;

const PEER_CHANNEL_CAPACITY: usize = 256;

struct Peer {
    id: u64,
    tx: mpsc::Sender<String>,
}

/// Accepts raw WebSocket connections on a `TcpListener` and fans
/// broadcast payloads out to every connected peer. HTTP upgrade
/// negotiation and authentication are handled by the out-of-scope REST
/// layer (§2); this transport speaks the WebSocket protocol directly,
/// as §6 requires no sub-protocol beyond plain JSON text frames.
#[derive(Clone)]
pub struct TungsteniteFanout {
    peers: Arc<Mutex<Vec<Peer>>>,
    next_id: Arc<AtomicU64>,
}

impl Default for TungsteniteFanout {
    fn default() -> Self {
        Self::new()
    }
}

impl TungsteniteFanout {
    pub fn new() -> Self {
        Self {
            peers: Arc::new(Mutex::new(Vec::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Accept connections forever on `listener`, spawning a write-pump
    /// task per peer. Intended to be `tokio::spawn`ed by the daemon at
    /// startup alongside the other background loops (§5).
    pub async fn accept_loop(self, listener: TcpListener) {
        loop {
            let (stream, _addr) = match listener.accept().await {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(error = %e, "fanout accept failed");
                    continue;
                }
            };
            let this = self.clone();
            tokio::spawn(async move {
                if let Err(e) = this.handle_connection(stream).await {
                    tracing::debug!(error = %e, "fanout connection ended");
                }
            });
        }
    }

    async fn handle_connection(&self, stream: TcpStream) -> Result<(), tokio_tungstenite::tungstenite::Error> {
        let ws = tokio_tungstenite::accept_async(stream).await?;
        let (mut sink, mut stream) = ws.split();
        let (tx, mut rx) = mpsc::channel::<String>(PEER_CHANNEL_CAPACITY);
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.peers.lock().push(Peer { id, tx });

        let peers = Arc::clone(&self.peers);
        tokio::spawn(async move {
            // Drain (and discard) any inbound client traffic so the
            // socket doesn't back up; the protocol is broadcast-only.
            while stream.next().await.is_some() {}
        });

        while let Some(payload) = rx.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
        peers.lock().retain(|p| p.id != id);
        Ok(())
    }
}

#[async_trait]
impl FanoutTransport for TungsteniteFanout {
    async fn broadcast(&self, payload: String) {
        let senders: Vec<mpsc::Sender<String>> = self.peers.lock().iter().map(|p| p.tx.clone()).collect();
        for tx in senders {
            // Best-effort: a full or closed channel means that peer is
            // gone or slow; it never blocks delivery to the others.
            let _ = tx.try_send(payload.clone());
        }
    }

    fn connection_count(&self) -> usize {
        self.peers.lock().len()
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
