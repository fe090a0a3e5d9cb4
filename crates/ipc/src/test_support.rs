// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for server and client tests.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::router::{Router, RouterError};
use crate::server::{IpcServer, ServerConfig};

/// Router with a handful of methods exercising success, failure and delay.
pub(crate) struct TestRouter;

#[async_trait]
impl Router for TestRouter {
    async fn handle(&self, method: &str, params: Value) -> Result<Value, RouterError> {
        match method {
            "echo" => Ok(params),
            "ping" => Ok(json!("pong")),
            "sleep" => {
                let ms = params.get("ms").and_then(Value::as_u64).unwrap_or(0);
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(json!({ "slept": ms }))
            }
            "fail" => Err(RouterError::Failed("handler exploded".to_string())),
            "add" => {
                let a = params.get("a").and_then(Value::as_i64);
                let b = params.get("b").and_then(Value::as_i64);
                match (a, b) {
                    (Some(a), Some(b)) => Ok(json!(a + b)),
                    _ => Err(RouterError::InvalidParams("expected {a, b}".to_string())),
                }
            }
            other => Err(RouterError::UnknownMethod(other.to_string())),
        }
    }

    fn list_methods(&self) -> Vec<String> {
        ["echo", "ping", "sleep", "fail", "add"]
            .iter()
            .map(|m| m.to_string())
            .collect()
    }
}

pub(crate) fn socket_in(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{}.sock", name))
}

pub(crate) fn test_config(path: &Path) -> ServerConfig {
    ServerConfig {
        socket_path: path.to_path_buf(),
        daemon_name: "test-brain".to_string(),
        stale_probe_timeout: Duration::from_millis(500),
        max_frame_len: None,
    }
}

pub(crate) async fn start_server(path: &Path) -> IpcServer {
    let mut server = IpcServer::new(Arc::new(TestRouter), test_config(path));
    server.start().await.unwrap();
    server
}

/// Poll until `check` passes or a second elapses.
pub(crate) async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
