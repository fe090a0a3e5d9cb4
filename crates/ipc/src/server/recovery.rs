// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Binding the socket, with recovery from sockets left by crashed daemons.
//!
//! ```text
//! Starting --bind ok--------------------------------> Listening
//!    |
//!    +--addr in use--> Probing --probe connects-----> Fatal (already running)
//!                         |
//!                         +--refused / timed out--> Reclaiming --bind ok--> Listening
//!                                                       |
//!                                                       +--bind fails-----> Fatal
//! ```
//!
//! Reclaiming happens at most once per start, which bounds the loop.

use std::future::Future;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::time::Duration;

use tokio::net::{UnixListener, UnixStream};
use tracing::{error, info, warn};

use super::ServerError;

/// States of the bind state machine.
#[derive(Debug)]
pub(crate) enum BindState {
    Starting,
    Probing,
    Reclaiming,
    Listening(UnixListener),
    Fatal(ServerError),
}

/// What the probe connection found at the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProbeOutcome {
    /// Another process accepted the probe
    Live,
    /// Nothing is listening; the socket file is left over
    Stale,
    /// The probe did not complete within the deadline
    TimedOut,
}

pub(crate) type ProbeFuture = Pin<Box<dyn Future<Output = io::Result<()>> + Send>>;

/// Opens the probe connection to a socket path.
pub(crate) type Connector = fn(PathBuf) -> ProbeFuture;

fn connect_socket(path: PathBuf) -> ProbeFuture {
    Box::pin(async move { UnixStream::connect(path).await.map(drop) })
}

/// Drives the state machine to `Listening` or `Fatal`.
pub(crate) struct Binder<'a> {
    path: &'a Path,
    daemon_name: &'a str,
    probe_timeout: Duration,
    connect: Connector,
    reclaimed: bool,
}

impl<'a> Binder<'a> {
    pub(crate) fn new(path: &'a Path, daemon_name: &'a str, probe_timeout: Duration) -> Self {
        Self {
            path,
            daemon_name,
            probe_timeout,
            connect: connect_socket,
            reclaimed: false,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_connector(mut self, connect: Connector) -> Self {
        self.connect = connect;
        self
    }

    /// Run until the listener is bound or binding is impossible.
    pub(crate) async fn bind(mut self) -> Result<UnixListener, ServerError> {
        let mut state = BindState::Starting;
        loop {
            state = match state {
                BindState::Starting => self.try_bind(),
                BindState::Probing => self.probe_and_decide().await,
                BindState::Reclaiming => self.reclaim(),
                BindState::Listening(listener) => return Ok(listener),
                BindState::Fatal(e) => return Err(e),
            };
        }
    }

    fn try_bind(&self) -> BindState {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                return BindState::Fatal(ServerError::Io(e));
            }
        }
        match UnixListener::bind(self.path) {
            Ok(listener) => BindState::Listening(listener),
            Err(e) if e.kind() == ErrorKind::AddrInUse && !self.reclaimed => {
                warn!(path = %self.path.display(), "IPC socket in use, probing for a live owner");
                BindState::Probing
            }
            Err(e) => BindState::Fatal(ServerError::BindFailed(self.path.to_path_buf(), e)),
        }
    }

    async fn probe_and_decide(&mut self) -> BindState {
        match probe(self.connect, self.path, self.probe_timeout).await {
            ProbeOutcome::Live => {
                error!(
                    path = %self.path.display(),
                    "IPC socket is held by another running daemon. Stop it first with: {} stop",
                    self.daemon_name
                );
                BindState::Fatal(ServerError::AlreadyRunning {
                    path: self.path.to_path_buf(),
                    daemon: self.daemon_name.to_string(),
                })
            }
            ProbeOutcome::Stale => {
                info!(path = %self.path.display(), "stale IPC socket detected, reclaiming");
                BindState::Reclaiming
            }
            ProbeOutcome::TimedOut => {
                warn!(path = %self.path.display(), "IPC socket probe timed out, treating as stale");
                BindState::Reclaiming
            }
        }
    }

    fn reclaim(&mut self) -> BindState {
        self.reclaimed = true;
        remove_stale_socket(self.path);
        match UnixListener::bind(self.path) {
            Ok(listener) => {
                info!(path = %self.path.display(), "IPC server recovered stale socket");
                BindState::Listening(listener)
            }
            Err(e) => BindState::Fatal(ServerError::BindFailed(self.path.to_path_buf(), e)),
        }
    }
}

/// Open a short-lived connection to see whether a daemon owns `path`.
pub(crate) async fn probe(connect: Connector, path: &Path, deadline: Duration) -> ProbeOutcome {
    match tokio::time::timeout(deadline, connect(path.to_path_buf())).await {
        Ok(Ok(())) => ProbeOutcome::Live,
        Ok(Err(_)) => ProbeOutcome::Stale,
        Err(_) => ProbeOutcome::TimedOut,
    }
}

fn remove_stale_socket(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove stale socket");
        }
    }
}

/// Remove the socket file a stopped server was bound to.
pub(crate) fn release_socket(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!(path = %path.display(), error = %e, "failed to remove socket file");
        }
    }
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
