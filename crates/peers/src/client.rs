// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Best-effort client for talking to peer daemons.
//!
//! Every call opens a short-lived connection, sends one request and closes
//! it again. Failures never propagate: an unreachable peer is simply absent
//! from the answer.

use std::time::Duration;

use async_trait::async_trait;
use brain_ipc::{env, ClientError, IpcClient};
use futures_util::future::join_all;
use serde_json::Value;
use tracing::debug;

use crate::link::{PeerError, PeerLink, PeerReply};
use crate::registry::{Peer, PeerRegistry};

pub struct CrossBrainClient {
    registry: PeerRegistry,
    query_timeout: Duration,
    probe_timeout: Duration,
}

impl CrossBrainClient {
    /// Client for the default peer set, minus `self_name`.
    pub fn new(self_name: impl Into<String>) -> Self {
        Self::from_registry(PeerRegistry::defaults(self_name))
    }

    /// Client for an explicit peer list, minus `self_name`.
    pub fn with_peers(self_name: impl Into<String>, peers: impl IntoIterator<Item = Peer>) -> Self {
        Self::from_registry(PeerRegistry::new(self_name, peers))
    }

    fn from_registry(registry: PeerRegistry) -> Self {
        Self {
            registry,
            query_timeout: env::peer_timeout(),
            probe_timeout: env::probe_timeout(),
        }
    }

    /// Override the query and availability-probe bounds.
    pub fn with_timeouts(mut self, query: Duration, probe: Duration) -> Self {
        self.query_timeout = query;
        self.probe_timeout = probe;
        self
    }

    pub fn registry(&self) -> &PeerRegistry {
        &self.registry
    }

    /// Names of configured peers, reachable or not.
    pub fn peer_names(&self) -> Vec<String> {
        self.registry.names()
    }

    /// Call `method` on `peer`. `None` if the peer is unknown, unreachable,
    /// slow or answers with an error.
    pub async fn query(&self, peer: &str, method: &str, params: Value) -> Option<Value> {
        let Some(target) = self.registry.get(peer) else {
            debug!(peer, "query to unknown peer skipped");
            return None;
        };
        match self.call(target, method, params).await {
            Ok(result) => Some(result),
            Err(e) => {
                debug!(peer, method, error = %e, "peer query failed");
                None
            }
        }
    }

    /// Call `method` on every peer concurrently. Peers that fail are omitted.
    pub async fn broadcast(&self, method: &str, params: Value) -> Vec<PeerReply> {
        let legs = self.registry.iter().map(|peer| {
            let params = params.clone();
            async move {
                match self.call(peer, method, params).await {
                    Ok(result) => Some(PeerReply {
                        name: peer.name.clone(),
                        result,
                    }),
                    Err(e) => {
                        debug!(peer = %peer.name, method, error = %e, "broadcast leg failed");
                        None
                    }
                }
            }
        });
        join_all(legs).await.into_iter().flatten().collect()
    }

    /// Names of peers that currently accept connections.
    pub async fn available_peers(&self) -> Vec<String> {
        let probes = self.registry.iter().map(|peer| async move {
            match IpcClient::connect(&peer.address, self.probe_timeout).await {
                Ok(client) => {
                    client.disconnect().await;
                    Some(peer.name.clone())
                }
                Err(_) => None,
            }
        });
        join_all(probes).await.into_iter().flatten().collect()
    }

    async fn call(&self, peer: &Peer, method: &str, params: Value) -> Result<Value, ClientError> {
        let window = self.query_timeout;
        let exchange = async {
            let client = IpcClient::connect(&peer.address, window).await?;
            let result = client.request(method, params).await;
            client.disconnect().await;
            result
        };
        tokio::time::timeout(window, exchange).await.map_err(|_| ClientError::Timeout(window))?
    }
}

#[async_trait]
impl PeerLink for CrossBrainClient {
    async fn query(
        &self,
        peer: &str,
        method: &str,
        params: Value,
    ) -> Result<Option<Value>, PeerError> {
        Ok(CrossBrainClient::query(self, peer, method, params).await)
    }

    async fn broadcast(&self, method: &str, params: Value) -> Result<Vec<PeerReply>, PeerError> {
        Ok(CrossBrainClient::broadcast(self, method, params).await)
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
