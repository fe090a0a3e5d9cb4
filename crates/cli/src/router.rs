// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in request handler served by `brain serve`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use async_trait::async_trait;
use brain_ipc::{Router, RouterError};
use brain_peers::{CrossBrainEvent, NOTIFY_METHOD};
use serde_json::{json, Value};
use tracing::info;

const METHODS: &[&str] = &["ping", "status", "methods", "echo", NOTIFY_METHOD];

pub struct DaemonRouter {
    name: String,
    started: Instant,
    events_received: AtomicU64,
}

impl DaemonRouter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            started: Instant::now(),
            events_received: AtomicU64::new(0),
        }
    }

    /// Number of cross-brain events accepted so far.
    pub fn events_received(&self) -> u64 {
        self.events_received.load(Ordering::Relaxed)
    }

    fn status(&self) -> Value {
        json!({
            "name": self.name,
            "pid": std::process::id(),
            "uptime_secs": self.started.elapsed().as_secs(),
            "version": env!("CARGO_PKG_VERSION"),
        })
    }

    fn receive_event(&self, params: Value) -> Result<Value, RouterError> {
        let event: CrossBrainEvent =
            serde_json::from_value(params).map_err(|e| RouterError::InvalidParams(e.to_string()))?;
        self.events_received.fetch_add(1, Ordering::Relaxed);
        info!(
            source = %event.source,
            event = %event.event,
            timestamp = %event.timestamp,
            data = %event.data,
            "cross-brain event received"
        );
        Ok(json!({ "received": true }))
    }
}

#[async_trait]
impl Router for DaemonRouter {
    async fn handle(&self, method: &str, params: Value) -> Result<Value, RouterError> {
        match method {
            "ping" => Ok(json!("pong")),
            "status" => Ok(self.status()),
            "methods" => Ok(json!(self.list_methods())),
            "echo" => Ok(params),
            NOTIFY_METHOD => self.receive_event(params),
            other => Err(RouterError::UnknownMethod(other.to_string())),
        }
    }

    fn list_methods(&self) -> Vec<String> {
        METHODS.iter().map(|m| m.to_string()).collect()
    }
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
