// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed framing.
//!
//! Every frame is a 4-byte big-endian payload length followed by exactly
//! that many bytes of UTF-8 JSON. The [`Decoder`] accumulates arbitrary
//! chunks from a stream and yields complete messages only once their whole
//! payload has arrived.

use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::Message;

/// Size of the length prefix in bytes.
pub const HEADER_LEN: usize = 4;

/// Protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Frame of {size} bytes exceeds limit of {limit} bytes")]
    FrameTooLarge { size: usize, limit: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a message to JSON without the length prefix.
pub fn encode_payload(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

/// Parse one JSON payload (no length prefix).
pub fn decode_payload(payload: &[u8]) -> Result<Message, ProtocolError> {
    Ok(serde_json::from_slice(payload)?)
}

/// Encode a message as a complete frame: length prefix + JSON payload.
pub fn encode(message: &Message) -> Result<Vec<u8>, ProtocolError> {
    let payload = encode_payload(message)?;
    let len = u32::try_from(payload.len()).map_err(|_| ProtocolError::FrameTooLarge {
        size: payload.len(),
        limit: u32::MAX as usize,
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Encode and write one frame, then flush.
pub async fn write_frame<W: AsyncWrite + Unpin>(
    writer: &mut W,
    message: &Message,
) -> Result<(), ProtocolError> {
    let frame = encode(message)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Incremental frame decoder for one byte stream.
///
/// Bytes are retained until a full frame is present; partial headers and
/// payloads are never interpreted.
#[derive(Debug, Default)]
pub struct Decoder {
    buf: Vec<u8>,
    max_frame_len: Option<usize>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject frames whose declared length exceeds `limit` bytes.
    pub fn with_max_frame_len(mut self, limit: Option<usize>) -> Self {
        self.max_frame_len = limit;
        self
    }

    /// Append a chunk and return every message it completes, in order.
    ///
    /// Messages decoded ahead of a bad frame are returned first; the bad
    /// frame stays buffered and its error comes from the next call. After an
    /// error callers are expected to [`reset`](Self::reset) before reusing
    /// the decoder.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Message>, ProtocolError> {
        self.extend(chunk);
        let mut messages = Vec::new();
        loop {
            match self.next_message() {
                Ok(Some(message)) => messages.push(message),
                Ok(None) => return Ok(messages),
                Err(_) if !messages.is_empty() => return Ok(messages),
                Err(e) => return Err(e),
            }
        }
    }

    /// Append a chunk without decoding anything.
    pub fn extend(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// Pop the next complete message, or `None` if more bytes are needed.
    pub fn next_message(&mut self) -> Result<Option<Message>, ProtocolError> {
        if self.buf.len() < HEADER_LEN {
            return Ok(None);
        }
        let len = u32::from_be_bytes([self.buf[0], self.buf[1], self.buf[2], self.buf[3]]) as usize;

        if let Some(limit) = self.max_frame_len {
            if len > limit {
                return Err(ProtocolError::FrameTooLarge { size: len, limit });
            }
        }

        let end = HEADER_LEN + len;
        if self.buf.len() < end {
            return Ok(None);
        }

        let message = decode_payload(&self.buf[HEADER_LEN..end])?;
        self.buf.drain(..end);
        Ok(Some(message))
    }

    /// Discard all buffered bytes.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    /// Number of bytes waiting for the rest of their frame.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
#[path = "codec_tests.rs"]
mod tests;
