// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code used when the router rejects a request.
pub const DISPATCH_ERROR_CODE: i64 = -1;

/// Error carried by a failed response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error for a request the router could not handle.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::new(DISPATCH_ERROR_CODE, message)
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

impl std::error::Error for RpcError {}

/// A single protocol message.
///
/// `params` and `result` use JSON `null` for "absent"; null values are
/// omitted on the wire and restored on decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    /// Call into the peer's router; always answered by a `Response`
    Request {
        id: String,
        method: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        params: Value,
    },

    /// Answer to the request with the same id
    Response {
        id: String,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        result: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<RpcError>,
    },

    /// Unsolicited push; never answered
    Notification {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<String>,
        #[serde(default, skip_serializing_if = "Value::is_null")]
        params: Value,
    },
}

impl Message {
    pub fn request(id: impl Into<String>, method: impl Into<String>, params: Value) -> Self {
        Message::Request {
            id: id.into(),
            method: method.into(),
            params,
        }
    }

    /// Successful response carrying `result`.
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Message::Response {
            id: id.into(),
            result,
            error: None,
        }
    }

    /// Failed response carrying `error` and no result.
    pub fn failure(id: impl Into<String>, error: RpcError) -> Self {
        Message::Response {
            id: id.into(),
            result: Value::Null,
            error: Some(error),
        }
    }

    pub fn notification(id: impl Into<String>, method: Option<String>, params: Value) -> Self {
        Message::Notification {
            id: id.into(),
            method,
            params,
        }
    }

    /// Correlation id of any message kind.
    pub fn id(&self) -> &str {
        match self {
            Message::Request { id, .. }
            | Message::Response { id, .. }
            | Message::Notification { id, .. } => id,
        }
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Message::Request { .. })
    }

    /// Converts a response into its outcome. An error takes precedence over
    /// any result. Returns `None` for requests and notifications.
    pub fn into_outcome(self) -> Option<Result<Value, RpcError>> {
        match self {
            Message::Response { error: Some(error), .. } => Some(Err(error)),
            Message::Response { result, error: None, .. } => Some(Ok(result)),
            Message::Request { .. } | Message::Notification { .. } => None,
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
