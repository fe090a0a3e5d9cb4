// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brain serve` - run a daemon endpoint in the foreground

use std::sync::Arc;

use anyhow::Result;
use brain_ipc::{IpcServer, ServerConfig, ServerError};
use clap::Args;
use tracing::{info, warn};

use crate::exit_error::{ExitError, EXIT_ALREADY_RUNNING};
use crate::router::DaemonRouter;

#[derive(Args)]
pub struct ServeArgs {
    /// Daemon name; determines the socket address
    #[arg(long, default_value = "brain")]
    pub name: String,
}

pub async fn serve(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::for_daemon(&args.name);
    let router = Arc::new(DaemonRouter::new(&args.name));
    let mut server = IpcServer::new(router, config);

    match server.start().await {
        Ok(()) => {}
        Err(e @ ServerError::AlreadyRunning { .. }) => {
            return Err(ExitError::new(EXIT_ALREADY_RUNNING, e.to_string()).into());
        }
        Err(e) => return Err(e.into()),
    }
    info!(
        name = %args.name,
        path = %server.address().display(),
        pid = std::process::id(),
        "brain daemon started"
    );

    shutdown_signal().await;
    info!(name = %args.name, "shutting down");
    server.stop().await;
    Ok(())
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = term.recv() => {}
                }
                return;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler"),
        }
    }
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C");
    }
}
