// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-brain command specs: `call`, `broadcast`, `peers`, `notify`.

use crate::prelude::*;

#[test]
fn call_to_stopped_peer_fails() {
    let sandbox = Sandbox::new();

    sandbox
        .brain()
        .args(&["call", "trading-brain", "ping"])
        .fails()
        .code(3)
        .stderr_has("Peer trading-brain is unavailable");
}

#[test]
fn call_to_self_is_never_attempted() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("brain");

    sandbox
        .brain()
        .args(&["call", "brain", "ping"])
        .fails()
        .code(3);
    sandbox
        .brain()
        .args(&["call", "brain", "ping", "--self-name", "trading-brain"])
        .passes();
}

#[test]
fn peers_shows_availability() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("trading-brain");

    let run = sandbox.brain().args(&["peers"]).passes();
    let stdout = run.stdout();
    let trading = stdout
        .lines()
        .find(|l| l.starts_with("trading-brain"))
        .unwrap();
    let marketing = stdout
        .lines()
        .find(|l| l.starts_with("marketing-brain"))
        .unwrap();
    assert!(trading.ends_with(" available"), "{}", stdout);
    assert!(marketing.ends_with("unavailable"), "{}", stdout);
    assert!(!stdout.lines().any(|l| l.starts_with("brain ")), "self should be excluded");
}

#[test]
fn peers_json_output() {
    let sandbox = Sandbox::new();

    let run = sandbox.brain().args(&["peers", "-o", "json"]).passes();
    let peers: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    let names: Vec<_> = peers
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].clone())
        .collect();
    assert_eq!(
        names,
        vec![
            serde_json::json!("trading-brain"),
            serde_json::json!("marketing-brain")
        ]
    );
    assert!(peers
        .as_array()
        .unwrap()
        .iter()
        .all(|p| p["available"] == false));
}

#[test]
fn broadcast_collects_live_answers_only() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("alpha");
    sandbox.serve("beta");

    sandbox
        .brain()
        .args(&["broadcast", "ping", "--peers", "alpha,beta,gamma"])
        .passes()
        .stdout_has("alpha: pong")
        .stdout_has("beta: pong")
        .stdout_lacks("gamma");
}

#[test]
fn broadcast_with_nobody_listening() {
    let sandbox = Sandbox::new();
    sandbox
        .brain()
        .args(&["broadcast", "ping"])
        .passes()
        .stdout_has("No peers answered");
}

#[test]
fn notify_delivers_event_to_live_peer() {
    let mut sandbox = Sandbox::new();
    sandbox.serve("marketing-brain");

    sandbox
        .brain()
        .args(&["notify", "insight.created", r#"{"id":1}"#])
        .passes()
        .stdout_has("Sent insight.created from brain");

    let logged = wait_for(SPEC_WAIT_MAX_MS, || {
        sandbox.log("marketing-brain").contains("cross-brain event received")
    });
    assert!(logged, "log:\n{}", sandbox.log("marketing-brain"));
}

#[test]
fn notify_with_no_peers_still_succeeds() {
    let sandbox = Sandbox::new();
    sandbox.brain().args(&["notify", "heartbeat"]).passes();
}

#[test]
fn malformed_params_are_rejected() {
    let sandbox = Sandbox::new();
    sandbox
        .brain()
        .args(&["call", "trading-brain", "echo", "{nope"])
        .fails()
        .code(1)
        .stderr_has("invalid JSON argument");
}
