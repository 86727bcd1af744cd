//! # chatlog
//!
//! Interactive front end for the `chatlog-store` message ledger.
//!
//! This binary provides:
//! - a numbered menu to add and switch users, send, list, search and sort
//!   messages, and undo the last one
//! - save/load of the whole history to a single comma-delimited file

mod config;
mod menu;

use std::io;

use anyhow::Context;
use chatlog_store::ChatRoom;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;
use crate::menu::Menu;

fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var).  Logs go to stderr
    //    so they never interleave with the menu on stdout.
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,chatlog=info,chatlog_store=info")),
        )
        .with_writer(io::stderr)
        .init();

    info!("Starting chatlog v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = CliConfig::from_env();
    info!(?config, "Loaded configuration");

    // -----------------------------------------------------------------------
    // 3. Run the menu against a single room until exit or EOF
    // -----------------------------------------------------------------------
    let mut room = ChatRoom::new(config.layout);
    let stdin = io::stdin();
    Menu::new(&mut room, &config.history_path, stdin.lock(), io::stdout())
        .run()
        .context("terminal I/O failed")?;

    info!(messages = room.count(), "Exiting");
    Ok(())
}
