// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI help output specs
//!
//! Verify help text displays for all commands.

use crate::prelude::*;

#[test]
fn brain_help_lists_subcommands() {
    cli()
        .args(&["--help"])
        .passes()
        .stdout_has("Usage:")
        .stdout_has("serve")
        .stdout_has("call")
        .stdout_has("broadcast")
        .stdout_has("peers")
        .stdout_has("notify");
}

#[test]
fn brain_no_args_shows_usage_and_fails() {
    cli().fails().stderr_has("Usage:");
}

#[test]
fn brain_serve_help_shows_name_flag() {
    cli()
        .args(&["serve", "--help"])
        .passes()
        .stdout_has("--name");
}

#[test]
fn brain_call_help_shows_arguments() {
    cli()
        .args(&["call", "--help"])
        .passes()
        .stdout_has("<PEER>")
        .stdout_has("<METHOD>")
        .stdout_has("--self-name");
}

#[test]
fn brain_version_prints_version() {
    cli()
        .args(&["--version"])
        .passes()
        .stdout_has(env!("CARGO_PKG_VERSION"));
}
