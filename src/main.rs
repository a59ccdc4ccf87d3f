//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `gopher_gateway` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - Ctrl-C handling
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;
use tokio_util::sync::CancellationToken;

use gopher_gateway::app::cancel_on_ctrl_c;
use gopher_gateway::initialization::{init_crypto_provider, init_logger_with};
use gopher_gateway::{run_gateway, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments into Config
    let config = Config::parse();

    // Initialize logger based on config
    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    // Initialize crypto provider for TLS operations
    init_crypto_provider();

    let shutdown = CancellationToken::new();
    let signal_task = cancel_on_ctrl_c(shutdown.clone());

    let result = run_gateway(config, shutdown.clone()).await;
    shutdown.cancel();
    let _ = signal_task.await;

    match result {
        Ok(report) => {
            println!(
                "Gateway stopped after {:.1}s ({} page{} served, {} error{})",
                report.uptime_seconds,
                report.pages_served,
                if report.pages_served == 1 { "" } else { "s" },
                report.errors,
                if report.errors == 1 { "" } else { "s" }
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("gopher_gateway error: {:#}", e);
            process::exit(1);
        }
    }
}
