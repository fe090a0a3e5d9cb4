// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brain serve` specs
//!
//! A daemon started with `serve` answers calls at its derived address and
//! refuses to start twice.

use crate::prelude::*;

#[test]
fn serve_then_call_round_trip() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("trading-brain");

    sandbox
        .brain()
        .args(&["call", "trading-brain", "ping"])
        .passes()
        .stdout_has("pong");
}

#[test]
fn call_passes_json_params() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("trading-brain");

    sandbox
        .brain()
        .args(&["call", "trading-brain", "echo", r#"{"symbol":"BTC","qty":2}"#])
        .passes()
        .stdout_has(r#""symbol": "BTC""#)
        .stdout_has(r#""qty": 2"#);
}

#[test]
fn status_reports_daemon_name() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("marketing-brain");

    sandbox
        .brain()
        .args(&["call", "marketing-brain", "status"])
        .passes()
        .stdout_has(r#""name": "marketing-brain""#)
        .stdout_has("uptime_secs");
}

#[test]
fn unknown_method_is_reported_unavailable() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("trading-brain");

    sandbox
        .brain()
        .args(&["call", "trading-brain", "no-such-method"])
        .fails()
        .code(3)
        .stderr_has("unavailable");
}

#[test]
fn second_serve_on_live_name_fails() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("brain");

    sandbox
        .brain()
        .args(&["serve", "--name", "brain"])
        .fails()
        .code(2)
        .stderr_has("stop it first with: brain stop");
}

#[test]
fn serve_reclaims_stale_socket() {
    let mut sandbox = Sandbox::new();
    std::fs::create_dir_all(sandbox.socket_dir()).unwrap();
    drop(std::os::unix::net::UnixListener::bind(sandbox.socket("trading-brain")).unwrap());

    sandbox.serve("trading-brain");
    sandbox
        .brain()
        .args(&["call", "trading-brain", "ping"])
        .passes()
        .stdout_has("pong");
}
