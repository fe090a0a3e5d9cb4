// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cross-daemon coordination between brain daemons.
//!
//! Peers are addressed by name only; [`CrossBrainClient`] queries and
//! broadcasts to them best-effort, and [`CrossBrainNotifier`] pushes event
//! envelopes on top of any [`PeerLink`].

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod link;
pub mod notifier;
pub mod registry;

pub use client::CrossBrainClient;
pub use link::{PeerError, PeerLink, PeerReply};
pub use notifier::{CrossBrainEvent, CrossBrainNotifier, NOTIFY_METHOD};
pub use registry::{Peer, PeerRegistry, DEFAULT_PEERS};
