// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch seam between the server and domain logic.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors a router raises for a request it cannot serve.
///
/// The server converts every variant into a `{code: -1, message}` response;
/// the connection stays open.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("Unknown method: {0}")]
    UnknownMethod(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("{0}")]
    Failed(String),
}

/// Maps method names to domain logic.
#[async_trait]
pub trait Router: Send + Sync + 'static {
    /// Handle one request. The returned value becomes the response `result`.
    async fn handle(&self, method: &str, params: Value) -> Result<Value, RouterError>;

    /// Stable enumeration of the methods `handle` accepts.
    fn list_methods(&self) -> Vec<String>;
}
