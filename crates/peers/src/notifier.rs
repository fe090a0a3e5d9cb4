// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fire-and-forget event notifications between daemons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::link::{PeerError, PeerLink};

/// Method peers receive event envelopes on.
pub const NOTIFY_METHOD: &str = "cross-brain.notify";

/// Envelope sent to peers for every event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossBrainEvent {
    pub source: String,
    pub event: String,
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl CrossBrainEvent {
    pub fn new(source: impl Into<String>, event: impl Into<String>, data: Value) -> Self {
        Self {
            source: source.into(),
            event: event.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Pushes events to peers. Never fails; problems are logged and dropped.
pub struct CrossBrainNotifier<L> {
    link: L,
    source: String,
}

impl<L: PeerLink> CrossBrainNotifier<L> {
    pub fn new(link: L, self_name: impl Into<String>) -> Self {
        Self {
            link,
            source: self_name.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Send `event` to every peer.
    pub async fn notify(&self, event: &str, data: Value) {
        if let Err(e) = self.try_notify(event, data).await {
            debug!(event, error = %e, "cross-brain notify failed");
        }
    }

    /// Send `event` to one peer.
    pub async fn notify_peer(&self, peer: &str, event: &str, data: Value) {
        if let Err(e) = self.try_notify_peer(peer, event, data).await {
            debug!(peer, event, error = %e, "cross-brain notify failed");
        }
    }

    async fn try_notify(&self, event: &str, data: Value) -> Result<(), PeerError> {
        let envelope = self.envelope(event, data)?;
        let replies = self.link.broadcast(NOTIFY_METHOD, envelope).await?;
        debug!(event, delivered = replies.len(), "cross-brain event broadcast");
        Ok(())
    }

    async fn try_notify_peer(&self, peer: &str, event: &str, data: Value) -> Result<(), PeerError> {
        let envelope = self.envelope(event, data)?;
        if self.link.query(peer, NOTIFY_METHOD, envelope).await?.is_none() {
            return Err(PeerError::Unavailable(peer.to_string()));
        }
        Ok(())
    }

    fn envelope(&self, event: &str, data: Value) -> Result<Value, PeerError> {
        Ok(serde_json::to_value(CrossBrainEvent::new(&*self.source, event, data))?)
    }
}

#[cfg(test)]
#[path = "notifier_tests.rs"]
mod tests;
