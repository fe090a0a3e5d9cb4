// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client for a daemon's IPC socket.
//!
//! One connection, one decoder. A background reader task decodes inbound
//! frames and completes in-flight requests by correlation id; requests may
//! be issued concurrently from several tasks sharing the client.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use brain_wire::{write_frame, Decoder, Message, ProtocolError, RpcError};
use parking_lot::Mutex;
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::env;

const READ_BUF_SIZE: usize = 8 * 1024;

type Waiter = oneshot::Sender<Result<Value, RpcError>>;

/// In-flight requests keyed by correlation id, plus the notification sink.
#[derive(Default)]
struct Pending {
    waiters: HashMap<String, Waiter>,
    /// Set once the reader has stopped; no response can arrive after this
    closed: bool,
    /// Present only while a taken receiver is listening
    notifications: Option<mpsc::UnboundedSender<Message>>,
    notifications_taken: bool,
}

impl Pending {
    /// Drop every waiter, which resolves their receivers as disconnected.
    fn close(&mut self) {
        self.closed = true;
        self.waiters.clear();
        self.notifications = None;
    }
}

type PendingMap = Mutex<Pending>;

/// Errors from client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to connect to {path}: {source}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Remote error: {0}")]
    Remote(RpcError),

    #[error("Disconnected")]
    Disconnected,

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Connected IPC client.
pub struct IpcClient {
    address: PathBuf,
    writer: tokio::sync::Mutex<Option<OwnedWriteHalf>>,
    pending: Arc<PendingMap>,
    reader: JoinHandle<()>,
    request_timeout: Duration,
}

impl IpcClient {
    /// Connect to the socket at `address`.
    ///
    /// `timeout` bounds the connect and becomes the default request window.
    pub async fn connect(
        address: impl AsRef<Path>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let path = address.as_ref().to_path_buf();
        let stream = match tokio::time::timeout(timeout, UnixStream::connect(&path)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(source)) => return Err(ClientError::Connect { path, source }),
            Err(_) => return Err(ClientError::Timeout(timeout)),
        };
        debug!(path = %path.display(), "IPC client connected");

        let (reader, writer) = stream.into_split();
        let pending: Arc<PendingMap> = Arc::new(Mutex::new(Pending::default()));
        let reader = tokio::spawn(read_loop(reader, Arc::clone(&pending)));

        Ok(Self {
            address: path,
            writer: tokio::sync::Mutex::new(Some(writer)),
            pending,
            reader,
            request_timeout: timeout,
        })
    }

    /// Connect to the daemon `name` at its derived address with the
    /// `BRAIN_IPC_TIMEOUT_MS` window.
    pub async fn connect_daemon(name: &str) -> Result<Self, ClientError> {
        Self::connect(env::socket_path(name), env::ipc_timeout()).await
    }

    /// Override the request window set by `connect`.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn address(&self) -> &Path {
        &self.address
    }

    /// Send a request and wait for its response.
    pub async fn request(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let id = Uuid::new_v4().to_string();
        let (tx, rx) = oneshot::channel();
        {
            let mut pending = self.pending.lock();
            if pending.closed {
                return Err(ClientError::Disconnected);
            }
            pending.waiters.insert(id.clone(), tx);
        }

        let message = Message::request(id.clone(), method, params);
        if let Err(e) = self.send(&message).await {
            self.pending.lock().waiters.remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(Ok(result))) => Ok(result),
            Ok(Ok(Err(error))) => Err(ClientError::Remote(error)),
            Ok(Err(_)) => Err(ClientError::Disconnected),
            Err(_) => {
                self.pending.lock().waiters.remove(&id);
                Err(ClientError::Timeout(self.request_timeout))
            }
        }
    }

    /// Receiver for notifications pushed by the server. Available once.
    ///
    /// Notifications that arrive before this is called are dropped.
    pub fn take_notifications(&self) -> Option<mpsc::UnboundedReceiver<Message>> {
        let mut pending = self.pending.lock();
        if pending.notifications_taken {
            return None;
        }
        pending.notifications_taken = true;

        let (tx, rx) = mpsc::unbounded_channel();
        if !pending.closed {
            pending.notifications = Some(tx);
        }
        Some(rx)
    }

    /// Number of requests awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().waiters.len()
    }

    /// False once the connection has closed from either side.
    pub fn is_connected(&self) -> bool {
        !self.pending.lock().closed
    }

    /// Close the connection and fail every pending request.
    pub async fn disconnect(&self) {
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(e) = writer.shutdown().await {
                debug!(error = %e, "IPC client shutdown failed");
            }
        }
        self.reader.abort();
        self.pending.lock().close();
    }

    async fn send(&self, message: &Message) -> Result<(), ClientError> {
        let mut guard = self.writer.lock().await;
        let writer = guard.as_mut().ok_or(ClientError::Disconnected)?;
        match write_frame(writer, message).await {
            Ok(()) => Ok(()),
            Err(ProtocolError::Io(e)) => {
                debug!(error = %e, "IPC client write failed");
                Err(ClientError::Disconnected)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Drop for IpcClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(mut reader: OwnedReadHalf, pending: Arc<PendingMap>) {
    let mut decoder = Decoder::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];

    'read: loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                debug!(error = %e, "IPC client read failed");
                break;
            }
        };

        decoder.extend(&buf[..n]);
        loop {
            match decoder.next_message() {
                Ok(Some(message)) => dispatch(message, &pending),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "IPC client protocol error, closing");
                    decoder.reset();
                    break 'read;
                }
            }
        }
    }

    pending.lock().close();
}

fn dispatch(message: Message, pending: &PendingMap) {
    match message {
        Message::Response { .. } => {
            let waiter = pending.lock().waiters.remove(message.id());
            match waiter {
                Some(waiter) => {
                    if let Some(outcome) = message.into_outcome() {
                        // Receiver may have timed out already
                        let _ = waiter.send(outcome);
                    }
                }
                None => debug!(id = %message.id(), "discarding unmatched response"),
            }
        }
        Message::Notification { .. } => {
            let mut pending = pending.lock();
            let delivered = match &pending.notifications {
                Some(tx) => tx.send(message).is_ok(),
                None => {
                    debug!(id = %message.id(), "no notification listener, dropping");
                    true
                }
            };
            if !delivered {
                // Receiver was dropped
                pending.notifications = None;
            }
        }
        Message::Request { .. } => debug!(id = %message.id(), "ignoring request from server"),
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
