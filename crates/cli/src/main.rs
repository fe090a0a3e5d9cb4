// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `brain` - brain daemon endpoint and cross-brain operator CLI

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod color;
mod commands;
mod exit_error;
mod logging;
mod output;
mod router;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::peer::{self, PeerArgs};
use commands::serve::{self, ServeArgs};
use exit_error::{ExitError, EXIT_FAILURE};
use output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "brain",
    version,
    about = "Brain daemon IPC endpoint and cross-brain coordination",
    styles = color::styles()
)]
struct Cli {
    /// Output format
    #[arg(short = 'o', long, value_enum, default_value_t, global = true)]
    output: OutputFormat,

    #[command(flatten)]
    peers: PeerArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a daemon endpoint until Ctrl-C or SIGTERM
    Serve(ServeArgs),
    /// Call a method on one peer and print the result
    Call {
        /// Peer daemon name
        peer: String,
        /// Method to call
        method: String,
        /// Params as JSON
        params: Option<String>,
    },
    /// Call a method on every peer and print the answers
    Broadcast {
        /// Method to call
        method: String,
        /// Params as JSON
        params: Option<String>,
    },
    /// List configured peers and whether each is reachable
    Peers,
    /// Send an event to every peer (best effort)
    Notify {
        /// Event name
        event: String,
        /// Event data as JSON
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        let code = e.downcast_ref::<ExitError>().map_or(EXIT_FAILURE, |exit| exit.code);
        eprintln!("Error: {:#}", e);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let log_file = match &cli.command {
        Commands::Serve(args) => logging::log_file_path(&args.name),
        _ => None,
    };
    let default_directive = if matches!(cli.command, Commands::Serve(_)) { "info" } else { "warn" };
    let _log_guard = match logging::init(default_directive, log_file.as_deref()) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: logging disabled: {:#}", e);
            None
        }
    };

    match cli.command {
        Commands::Serve(args) => serve::serve(args).await,
        Commands::Call { peer: name, method, params } => {
            peer::call(&cli.peers, &name, &method, params.as_deref()).await
        }
        Commands::Broadcast { method, params } => {
            peer::broadcast(&cli.peers, &method, params.as_deref(), cli.output).await
        }
        Commands::Peers => peer::list(&cli.peers, cli.output).await,
        Commands::Notify { event, data } => {
            peer::notify(&cli.peers, &event, data.as_deref()).await
        }
    }
}
