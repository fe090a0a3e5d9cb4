// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod peer;
pub mod serve;

use anyhow::{Context, Result};
use brain_peers::{CrossBrainClient, Peer};
use serde_json::Value;

/// Parse an optional JSON argument. Absent means `null`.
pub fn parse_json_arg(raw: Option<&str>) -> Result<Value> {
    match raw {
        None => Ok(Value::Null),
        Some(text) => {
            serde_json::from_str(text).with_context(|| format!("invalid JSON argument: {}", text))
        }
    }
}

/// Cross-brain client for `self_name`: the default peers, or `peers` when given.
pub fn peer_client(self_name: &str, peers: &[String]) -> CrossBrainClient {
    if peers.is_empty() {
        CrossBrainClient::new(self_name)
    } else {
        CrossBrainClient::with_peers(self_name, peers.iter().map(|name| Peer::named(name)))
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
