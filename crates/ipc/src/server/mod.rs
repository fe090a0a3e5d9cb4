// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC server for one daemon endpoint.
//!
//! The accept loop runs in a spawned task; every accepted connection gets
//! its own task, decoder and write channel, so input on one connection never
//! blocks another. Requests on a connection are handled one at a time and
//! answered in order.

mod connection;
mod recovery;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use brain_wire::{encode, Message, ProtocolError};
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::net::UnixListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::env;
use crate::router::Router;

use connection::Connection;
use recovery::Binder;

/// Server-assigned identifier of an accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Write side of an open connection, shared by responses and notifications.
pub(crate) type FrameSender = mpsc::UnboundedSender<Vec<u8>>;
type ConnectionTable = Mutex<HashMap<ConnectionId, FrameSender>>;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the Unix socket
    pub socket_path: PathBuf,
    /// Daemon name, used in the "already running" diagnostic
    pub daemon_name: String,
    /// Deadline for the stale-socket probe
    pub stale_probe_timeout: Duration,
    /// Optional cap on inbound frame size
    pub max_frame_len: Option<usize>,
}

impl ServerConfig {
    pub fn new(socket_path: impl Into<PathBuf>, daemon_name: impl Into<String>) -> Self {
        Self {
            socket_path: socket_path.into(),
            daemon_name: daemon_name.into(),
            stale_probe_timeout: env::stale_probe_timeout(),
            max_frame_len: env::max_frame_bytes(),
        }
    }

    /// Configuration for the named daemon at its deterministic address.
    pub fn for_daemon(name: &str) -> Self {
        Self::new(env::socket_path(name), name)
    }
}

/// Errors from server operations
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(
        "IPC socket {path} is held by another running daemon (stop it first with: {daemon} stop)"
    )]
    AlreadyRunning { path: PathBuf, daemon: String },

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, std::io::Error),

    #[error("Server already started")]
    AlreadyStarted,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// State shared between the server handle and its tasks.
pub(crate) struct Shared {
    pub router: Arc<dyn Router>,
    pub connections: ConnectionTable,
    pub max_frame_len: Option<usize>,
}

/// IPC server bound to one socket path.
pub struct IpcServer {
    config: ServerConfig,
    shared: Arc<Shared>,
    next_id: Arc<AtomicU64>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    accept: Option<JoinHandle<()>>,
}

impl IpcServer {
    pub fn new(router: Arc<dyn Router>, config: ServerConfig) -> Self {
        let shared = Arc::new(Shared {
            router,
            connections: Mutex::new(HashMap::new()),
            max_frame_len: config.max_frame_len,
        });
        Self {
            config,
            shared,
            next_id: Arc::new(AtomicU64::new(1)),
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            accept: None,
        }
    }

    pub fn address(&self) -> &Path {
        &self.config.socket_path
    }

    /// Bind the socket (reclaiming a stale one if needed) and start accepting.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.accept.is_some() {
            return Err(ServerError::AlreadyStarted);
        }

        let listener = Binder::new(
            &self.config.socket_path,
            &self.config.daemon_name,
            self.config.stale_probe_timeout,
        )
        .bind()
        .await?;
        info!(path = %self.config.socket_path.display(), "IPC server listening");

        // A stopped server leaves its token cancelled and its tracker closed
        self.cancel = CancellationToken::new();
        self.tracker = TaskTracker::new();

        let accept = accept_loop(
            listener,
            Arc::clone(&self.shared),
            Arc::clone(&self.next_id),
            self.cancel.clone(),
            self.tracker.clone(),
        );
        self.accept = Some(tokio::spawn(accept));
        Ok(())
    }

    /// Push a notification to one connection, or to all when `connection` is `None`.
    ///
    /// Connections that can no longer be written to are skipped silently.
    pub fn notify(
        &self,
        connection: Option<ConnectionId>,
        method: Option<String>,
        params: Value,
    ) -> Result<(), ServerError> {
        let message = Message::notification(Uuid::new_v4().to_string(), method, params);
        let frame = encode(&message)?;

        let connections = self.shared.connections.lock();
        match connection {
            Some(id) => {
                if let Some(tx) = connections.get(&id) {
                    let _ = tx.send(frame);
                }
            }
            None => {
                for tx in connections.values() {
                    let _ = tx.send(frame.clone());
                }
            }
        }
        Ok(())
    }

    /// Number of open connections.
    pub fn client_count(&self) -> usize {
        self.shared.connections.lock().len()
    }

    /// Ids of open connections.
    pub fn connection_ids(&self) -> Vec<ConnectionId> {
        let mut ids: Vec<_> = self.shared.connections.lock().keys().copied().collect();
        ids.sort();
        ids
    }

    /// Close every connection, stop accepting and release the socket.
    ///
    /// The socket file is only removed if this server bound it; a server
    /// whose `start` failed leaves the address to its owner.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        let bound = match self.accept.take() {
            Some(accept) => {
                if let Err(e) = accept.await {
                    if !e.is_cancelled() {
                        error!("IPC accept task failed: {}", e);
                    }
                }
                true
            }
            None => false,
        };
        self.tracker.close();
        self.tracker.wait().await;
        self.shared.connections.lock().clear();
        if bound {
            recovery::release_socket(&self.config.socket_path);
            info!("IPC server stopped");
        }
    }
}

impl Drop for IpcServer {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn accept_loop(
    listener: UnixListener,
    shared: Arc<Shared>,
    next_id: Arc<AtomicU64>,
    cancel: CancellationToken,
    tracker: TaskTracker,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            result = listener.accept() => match result {
                Ok((stream, _)) => {
                    let id = ConnectionId(next_id.fetch_add(1, Ordering::Relaxed));
                    let (tx, rx) = mpsc::unbounded_channel();
                    shared.connections.lock().insert(id, tx.clone());
                    info!(connection = %id, "IPC client connected");

                    let conn = Connection::new(id, Arc::clone(&shared), tx);
                    tracker.spawn(conn.run(stream, rx, cancel.clone()));
                }
                Err(e) => error!("IPC accept error: {}", e),
            }
        }
    }
    debug!("IPC accept loop exited");
}

#[cfg(test)]
#[path = "../server_tests.rs"]
mod tests;
