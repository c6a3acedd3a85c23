//! Relay configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Default listen port
pub const DEFAULT_PORT: u16 = 8514;

/// Default maximum inbound frame size (1MB)
pub const DEFAULT_MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Default per-connection outbound queue depth
pub const DEFAULT_OUTBOUND_BUFFER: usize = 256;

/// Path served by the health endpoint
pub const HEALTH_PATH: &str = "/health";

/// Main relay configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 8514, 0 = pick a free port)
    pub port: u16,
    /// HTTP path upgraded to WebSocket
    pub ws_path: String,
    /// Inbound frames above this size are dropped unread
    pub max_message_size: usize,
    /// Outbound frames queued per connection; frames beyond it are dropped
    pub outbound_buffer: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            ws_path: "/".to_string(),
            max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
            outbound_buffer: DEFAULT_OUTBOUND_BUFFER,
        }
    }
}

impl RelayConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.ws_path.starts_with('/') {
            return Err(ConfigError::InvalidPath(format!(
                "{} must start with '/'",
                self.ws_path
            )));
        }

        // Captures and wildcards would turn the route into a pattern
        if self.ws_path.contains([':', '*', '{', '}']) {
            return Err(ConfigError::InvalidPath(format!(
                "{} must be a literal path",
                self.ws_path
            )));
        }

        if self.ws_path == HEALTH_PATH {
            return Err(ConfigError::InvalidPath(format!(
                "{} is reserved for the health endpoint",
                HEALTH_PATH
            )));
        }

        if self.max_message_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max_message_size cannot be 0".into(),
            ));
        }

        if self.outbound_buffer == 0 {
            return Err(ConfigError::InvalidLimit(
                "outbound_buffer cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get server bind address
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// WebSocket path unusable as a route
    #[error("invalid websocket path: {0}")]
    InvalidPath(String),
    /// Invalid size or count limit
    #[error("invalid limit: {0}")]
    InvalidLimit(String),
    /// Configuration source could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
