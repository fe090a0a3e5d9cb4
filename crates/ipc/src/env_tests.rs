// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use serial_test::serial;

use super::*;

#[cfg(unix)]
#[test]
#[serial]
fn socket_path_uses_override_dir() {
    std::env::set_var("BRAIN_SOCKET_DIR", "/run/brains");
    let path = socket_path("trading-brain");
    std::env::remove_var("BRAIN_SOCKET_DIR");

    assert_eq!(path, PathBuf::from("/run/brains/trading-brain.sock"));
}

#[cfg(unix)]
#[test]
#[serial]
fn socket_path_defaults_to_temp_dir() {
    std::env::remove_var("BRAIN_SOCKET_DIR");
    assert_eq!(socket_path("brain"), std::env::temp_dir().join("brain.sock"));
}

#[cfg(unix)]
#[test]
#[serial]
fn socket_path_is_deterministic_per_name() {
    std::env::remove_var("BRAIN_SOCKET_DIR");
    assert_eq!(socket_path("marketing-brain"), socket_path("marketing-brain"));
    assert_ne!(socket_path("brain"), socket_path("marketing-brain"));
}

#[test]
#[serial]
fn data_dir_prefers_env() {
    std::env::set_var("BRAIN_DATA_DIR", "/var/lib/brain");
    let dir = data_dir();
    std::env::remove_var("BRAIN_DATA_DIR");

    assert_eq!(dir, Some(PathBuf::from("/var/lib/brain")));
}

#[test]
#[serial]
fn timeouts_default_and_override() {
    let cases: [(&str, fn() -> Duration, u64); 4] = [
        ("BRAIN_IPC_TIMEOUT_MS", ipc_timeout, 5_000),
        ("BRAIN_PEER_TIMEOUT_MS", peer_timeout, 3_000),
        ("BRAIN_PROBE_TIMEOUT_MS", probe_timeout, 1_000),
        ("BRAIN_STALE_PROBE_MS", stale_probe_timeout, 2_000),
    ];

    for (var, read, default_ms) in cases {
        std::env::remove_var(var);
        assert_eq!(read(), Duration::from_millis(default_ms), "{} default", var);

        std::env::set_var(var, "250");
        assert_eq!(read(), Duration::from_millis(250), "{} override", var);

        std::env::set_var(var, "not-a-number");
        assert_eq!(read(), Duration::from_millis(default_ms), "{} fallback", var);
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn max_frame_bytes_is_unbounded_by_default() {
    std::env::remove_var("BRAIN_MAX_FRAME_BYTES");
    assert_eq!(max_frame_bytes(), None);

    std::env::set_var("BRAIN_MAX_FRAME_BYTES", "1048576");
    assert_eq!(max_frame_bytes(), Some(1_048_576));
    std::env::remove_var("BRAIN_MAX_FRAME_BYTES");
}
