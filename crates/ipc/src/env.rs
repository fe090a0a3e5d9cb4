// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the IPC layer.

use std::path::PathBuf;
use std::time::Duration;

/// Resolve the socket directory: BRAIN_SOCKET_DIR > OS temp dir
pub fn socket_dir() -> PathBuf {
    match std::env::var("BRAIN_SOCKET_DIR") {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir(),
    }
}

/// Deterministic endpoint address for a daemon name.
///
/// Peers derive each other's address from the name alone, so no discovery
/// service is needed.
#[cfg(not(windows))]
pub fn socket_path(name: &str) -> PathBuf {
    socket_dir().join(format!("{}.sock", name))
}

/// Deterministic endpoint address for a daemon name.
#[cfg(windows)]
pub fn socket_path(name: &str) -> PathBuf {
    PathBuf::from(format!(r"\\.\pipe\{}", name))
}

/// Resolve the data directory: BRAIN_DATA_DIR > ~/.brain
pub fn data_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("BRAIN_DATA_DIR") {
        if !dir.is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    dirs::home_dir().map(|home| home.join(".brain"))
}

fn duration_ms(var: &str, default_ms: u64) -> Duration {
    std::env::var(var)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_millis(default_ms))
}

/// Default IPC client timeout
pub fn ipc_timeout() -> Duration {
    duration_ms("BRAIN_IPC_TIMEOUT_MS", 5_000)
}

/// Bound on a single cross-daemon query (connect + request)
pub fn peer_timeout() -> Duration {
    duration_ms("BRAIN_PEER_TIMEOUT_MS", 3_000)
}

/// Bound on a liveness probe against a peer
pub fn probe_timeout() -> Duration {
    duration_ms("BRAIN_PROBE_TIMEOUT_MS", 1_000)
}

/// How long the stale-socket probe waits before declaring the socket stale
pub fn stale_probe_timeout() -> Duration {
    duration_ms("BRAIN_STALE_PROBE_MS", 2_000)
}

/// Optional cap on a declared frame length. Unset means unbounded.
pub fn max_frame_bytes() -> Option<usize> {
    std::env::var("BRAIN_MAX_FRAME_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
