// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-connection request handling.

use std::sync::Arc;

use brain_wire::{encode, Decoder, Message, ProtocolError, RpcError};
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::UnixStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::{ConnectionId, FrameSender, Shared};

const READ_BUF_SIZE: usize = 8 * 1024;

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Writer closed")]
    WriterClosed,
}

/// One accepted client. Removes itself from the connection table on drop.
pub(crate) struct Connection {
    id: ConnectionId,
    shared: Arc<Shared>,
    tx: FrameSender,
}

impl Connection {
    pub(crate) fn new(id: ConnectionId, shared: Arc<Shared>, tx: FrameSender) -> Self {
        Self { id, shared, tx }
    }

    /// Serve the connection until the client leaves, an error occurs, or
    /// the server is cancelled.
    pub(crate) async fn run(
        self,
        stream: UnixStream,
        rx: mpsc::UnboundedReceiver<Vec<u8>>,
        cancel: CancellationToken,
    ) {
        let (reader, writer) = stream.into_split();
        let mut writer = tokio::spawn(write_loop(self.id, writer, rx));

        let cancelled = tokio::select! {
            _ = cancel.cancelled() => true,
            result = self.read_loop(reader) => {
                if let Err(e) = result {
                    log_connection_error(self.id, e);
                }
                false
            }
        };

        let id = self.id;
        drop(self);
        let drained = if cancelled {
            false
        } else {
            // Let queued responses drain before the socket closes, unless the
            // server stops first
            tokio::select! {
                _ = &mut writer => true,
                _ = cancel.cancelled() => false,
            }
        };
        if !drained {
            writer.abort();
        }
        info!(connection = %id, "IPC client disconnected");
    }

    async fn read_loop(&self, mut reader: OwnedReadHalf) -> Result<(), ConnectionError> {
        let mut decoder = Decoder::new().with_max_frame_len(self.shared.max_frame_len);
        let mut buf = vec![0u8; READ_BUF_SIZE];

        loop {
            let n = reader.read(&mut buf).await?;
            if n == 0 {
                return Ok(());
            }

            decoder.extend(&buf[..n]);
            loop {
                match decoder.next_message() {
                    Ok(Some(message)) => self.handle_message(message).await?,
                    Ok(None) => break,
                    Err(e) => {
                        decoder.reset();
                        return Err(e.into());
                    }
                }
            }
        }
    }

    /// Dispatch one request to the router and queue its response.
    async fn handle_message(&self, message: Message) -> Result<(), ConnectionError> {
        let (id, method, params) = match message {
            Message::Request { id, method, params } => (id, method, params),
            other => {
                debug!(connection = %self.id, id = %other.id(), "ignoring non-request message");
                return Ok(());
            }
        };

        debug!(connection = %self.id, %method, "received request");
        let response = match self.shared.router.handle(&method, params).await {
            Ok(result) => Message::success(id, result),
            Err(e) => {
                debug!(connection = %self.id, %method, error = %e, "request failed");
                Message::failure(id, RpcError::dispatch(e.to_string()))
            }
        };

        let frame = encode(&response)?;
        self.tx.send(frame).map_err(|_| ConnectionError::WriterClosed)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.shared.connections.lock().remove(&self.id);
    }
}

async fn write_loop(
    id: ConnectionId,
    mut writer: OwnedWriteHalf,
    mut rx: mpsc::UnboundedReceiver<Vec<u8>>,
) {
    while let Some(frame) = rx.recv().await {
        if let Err(e) = writer.write_all(&frame).await {
            debug!(connection = %id, error = %e, "IPC write failed");
            return;
        }
    }
    let _ = writer.shutdown().await;
}

fn log_connection_error(id: ConnectionId, e: ConnectionError) {
    match e {
        ConnectionError::Protocol(e) => {
            warn!(connection = %id, error = %e, "protocol error, dropping connection")
        }
        ConnectionError::WriterClosed => debug!(connection = %id, "client stopped reading"),
        ConnectionError::Io(e) => error!(connection = %id, error = %e, "IPC client error"),
    }
}
