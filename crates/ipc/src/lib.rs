// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local IPC transport for brain daemons.
//!
//! Each daemon serves one Unix socket through [`IpcServer`], dispatching
//! requests to a [`Router`]. [`IpcClient`] talks to any daemon's socket.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod env;
pub mod router;
pub mod server;

pub use client::{ClientError, IpcClient};
pub use router::{Router, RouterError};
pub use server::{ConnectionId, IpcServer, ServerConfig, ServerError};

#[cfg(test)]
mod test_support;
