// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brain call` / `broadcast` / `peers` / `notify` - talk to peer daemons

use anyhow::Result;
use brain_peers::CrossBrainNotifier;
use clap::Args;

use super::{parse_json_arg, peer_client};
use crate::exit_error::ExitError;
use crate::output::{print_peers, print_replies, print_value, OutputFormat, PeerStatus};

/// Identity and peer set shared by the peer-facing commands.
#[derive(Args, Clone)]
pub struct PeerArgs {
    /// Name of the calling daemon; never contacted
    #[arg(long, default_value = "brain", global = true)]
    pub self_name: String,

    /// Peer names to use instead of the defaults (comma-separated)
    #[arg(long, value_delimiter = ',', global = true)]
    pub peers: Vec<String>,
}

pub async fn call(
    peers: &PeerArgs,
    peer: &str,
    method: &str,
    params: Option<&str>,
) -> Result<()> {
    let params = parse_json_arg(params)?;
    let client = peer_client(&peers.self_name, &peers.peers);
    match client.query(peer, method, params).await {
        Some(result) => print_value(&result),
        None => Err(ExitError::unavailable(peer).into()),
    }
}

pub async fn broadcast(
    peers: &PeerArgs,
    method: &str,
    params: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let params = parse_json_arg(params)?;
    let client = peer_client(&peers.self_name, &peers.peers);
    let mut replies = client.broadcast(method, params).await;
    replies.sort_by(|a, b| a.name.cmp(&b.name));
    print_replies(&replies, format)
}

pub async fn list(peers: &PeerArgs, format: OutputFormat) -> Result<()> {
    let client = peer_client(&peers.self_name, &peers.peers);
    let available = client.available_peers().await;
    let statuses: Vec<PeerStatus> = client
        .registry()
        .iter()
        .map(|peer| PeerStatus {
            name: peer.name.clone(),
            address: peer.address.clone(),
            available: available.contains(&peer.name),
        })
        .collect();
    print_peers(&statuses, format)
}

pub async fn notify(peers: &PeerArgs, event: &str, data: Option<&str>) -> Result<()> {
    let data = parse_json_arg(data)?;
    let client = peer_client(&peers.self_name, &peers.peers);
    let notifier = CrossBrainNotifier::new(client, &*peers.self_name);
    notifier.notify(event, data).await;
    println!("Sent {} from {}", event, notifier.source());
    Ok(())
}
