// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transport-agnostic seam over cross-daemon calls.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// One successful leg of a broadcast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeerReply {
    pub name: String,
    pub result: Value,
}

#[derive(Debug, Error)]
pub enum PeerError {
    #[error("Peer {0} is unavailable")]
    Unavailable(String),

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Best-effort calls to named peers.
#[async_trait]
pub trait PeerLink: Send + Sync {
    /// Call `method` on one peer. `Ok(None)` means the peer did not answer.
    async fn query(&self, peer: &str, method: &str, params: Value)
        -> Result<Option<Value>, PeerError>;

    /// Call `method` on every peer, collecting the answers that arrived.
    async fn broadcast(&self, method: &str, params: Value) -> Result<Vec<PeerReply>, PeerError>;
}
