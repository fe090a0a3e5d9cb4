// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use brain_peers::PeerReply;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;

use crate::color;

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;

#[derive(Clone, Copy, Debug, Default, PartialEq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Reachability of one configured peer, as shown by `brain peers`.
#[derive(Debug, Clone, Serialize)]
pub struct PeerStatus {
    pub name: String,
    pub address: PathBuf,
    pub available: bool,
}

/// Compact single-line rendering of a payload.
pub fn compact(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_reply_line(reply: &PeerReply) -> String {
    format!("{}: {}", color::header(&reply.name), compact(&reply.result))
}

pub fn format_peer_line(status: &PeerStatus, name_width: usize) -> String {
    let name = format!("{:<width$}", status.name, width = name_width);
    let state = if status.available {
        "available".to_string()
    } else {
        color::muted("unavailable")
    };
    format!("{}  {}", color::header(&name), state)
}

/// Print a single result: pretty JSON in both formats.
pub fn print_value(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_replies(replies: &[PeerReply], format: OutputFormat) -> anyhow::Result<()> {
    format_or_json(format, &replies, || {
        if replies.is_empty() {
            println!("No peers answered");
        }
        for reply in replies {
            println!("{}", format_reply_line(reply));
        }
    })
}

pub fn print_peers(peers: &[PeerStatus], format: OutputFormat) -> anyhow::Result<()> {
    format_or_json(format, &peers, || {
        if peers.is_empty() {
            println!("No peers configured");
        }
        let width = peers.iter().map(|p| p.name.len()).max().unwrap_or(0);
        for peer in peers {
            println!("{}", format_peer_line(peer, width));
        }
    })
}

/// Print `data` as pretty JSON, or run `text_fn` for human output.
pub fn format_or_json<T: Serialize>(
    format: OutputFormat,
    data: &T,
    text_fn: impl FnOnce(),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(data)?);
        }
        OutputFormat::Text => {
            text_fn();
        }
    }
    Ok(())
}
