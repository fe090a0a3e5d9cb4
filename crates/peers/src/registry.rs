// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Named peers and their addresses.

use std::path::PathBuf;

use brain_ipc::env;
use serde::Serialize;

/// Daemons a brain talks to when no explicit list is given.
pub const DEFAULT_PEERS: &[&str] = &["brain", "trading-brain", "marketing-brain"];

/// A peer daemon reachable at a local endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Peer {
    pub name: String,
    pub address: PathBuf,
}

impl Peer {
    pub fn new(name: impl Into<String>, address: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    /// Peer at the deterministic address derived from its name.
    pub fn named(name: &str) -> Self {
        Self::new(name, env::socket_path(name))
    }
}

/// Peers of one daemon. Never contains the daemon itself.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    self_name: String,
    peers: Vec<Peer>,
}

impl PeerRegistry {
    /// Build a registry, dropping entries named `self_name` and repeated names.
    pub fn new(self_name: impl Into<String>, peers: impl IntoIterator<Item = Peer>) -> Self {
        let self_name = self_name.into();
        let mut kept: Vec<Peer> = Vec::new();
        for peer in peers {
            if peer.name == self_name || kept.iter().any(|p| p.name == peer.name) {
                continue;
            }
            kept.push(peer);
        }
        Self {
            self_name,
            peers: kept,
        }
    }

    /// Registry of [`DEFAULT_PEERS`] at their derived addresses.
    pub fn defaults(self_name: impl Into<String>) -> Self {
        Self::new(self_name, DEFAULT_PEERS.iter().map(|name| Peer::named(name)))
    }

    pub fn self_name(&self) -> &str {
        &self.self_name
    }

    pub fn get(&self, name: &str) -> Option<&Peer> {
        self.peers.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.peers.iter().map(|p| p.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Peer> {
        self.peers.iter()
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
