//! Command-line flags.

use crate::config::RuntimeConfig;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;

/// Rendezvous relay for peer-to-peer connection negotiation
#[derive(Debug, Clone, Parser)]
#[command(name = "relay-runtime", version, about)]
pub struct Args {
    /// TOML configuration file (also read from RV_CONFIG)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on, 0 for any free port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// HTTP path upgraded to WebSocket
    #[arg(long)]
    pub ws_path: Option<String>,

    /// Largest inbound frame in bytes
    #[arg(long)]
    pub max_message_size: Option<usize>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit JSON log lines
    #[arg(long)]
    pub json_logs: bool,
}

impl Args {
    /// Overlay flags that were given onto `config`.
    pub fn apply(&self, config: &mut RuntimeConfig) {
        if let Some(host) = self.host {
            config.relay.host = host;
        }
        if let Some(port) = self.port {
            config.relay.port = port;
        }
        if let Some(path) = &self.ws_path {
            config.relay.ws_path = path.clone();
        }
        if let Some(size) = self.max_message_size {
            config.relay.max_message_size = size;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}
