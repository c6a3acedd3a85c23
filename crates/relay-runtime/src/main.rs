//! Rendezvous relay entry point.
//!
//! ## Startup Sequence
//!
//! 1. Parse flags and resolve configuration (file, env, flags)
//! 2. Install logging
//! 3. Bind the relay listener
//! 4. Serve until Ctrl+C, then stop accepting connections

use anyhow::{Context, Result};
use clap::Parser;
use relay_runtime::{config, telemetry, Args};
use rv_02_signal_relay::{RelayService, VERSION};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = config::load(&args, |key| std::env::var(key).ok())?;

    telemetry::init(&config.logging)?;

    info!(version = VERSION, "Starting rendezvous relay");

    let service = RelayService::bind(config.relay)
        .await
        .context("failed to start relay")?;

    service.run(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => error!(error = %e, "Failed to listen for Ctrl+C, shutting down"),
    }
}
