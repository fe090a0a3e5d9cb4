// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol shared by brain daemons and their clients.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod codec;
mod message;

pub use codec::{
    decode_payload, encode, encode_payload, write_frame, Decoder, ProtocolError, HEADER_LEN,
};
pub use message::{Message, RpcError, DISPATCH_ERROR_CODE};

/// Schema-less payload carried in params, results and notifications.
pub use serde_json::Value;
