//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, an optional TOML
//! file, `RV_*` environment variables, command-line flags.

use crate::cli::Args;
use anyhow::{bail, Context, Result};
use rv_02_signal_relay::RelayConfig;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Environment variable naming the TOML config file
pub const CONFIG_ENV: &str = "RV_CONFIG";

/// Everything the runtime needs to start
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

/// Log output settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RuntimeConfig {
    /// Read a TOML file with optional `[relay]` and `[logging]` tables.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Overlay `RV_*` variables resolved through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("RV_HOST") {
            self.relay.host = parse_var("RV_HOST", &value)?;
        }
        if let Some(value) = lookup("RV_PORT") {
            self.relay.port = parse_var("RV_PORT", &value)?;
        }
        if let Some(value) = lookup("RV_WS_PATH") {
            self.relay.ws_path = value;
        }
        if let Some(value) = lookup("RV_MAX_MESSAGE_SIZE") {
            self.relay.max_message_size = parse_var("RV_MAX_MESSAGE_SIZE", &value)?;
        }
        if let Some(value) = lookup("RV_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = lookup("RV_JSON_LOGS") {
            self.logging.json = parse_flag("RV_JSON_LOGS", &value)?;
        }
        Ok(())
    }
}

/// Resolve the full configuration from every source and validate it.
pub fn load<F>(args: &Args, lookup: F) -> Result<RuntimeConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let path = args
        .config
        .clone()
        .or_else(|| lookup(CONFIG_ENV).map(PathBuf::from));

    let mut config = match path {
        Some(path) => RuntimeConfig::from_file(&path)?,
        None => RuntimeConfig::default(),
    };

    config.apply_env(&lookup)?;
    args.apply(&mut config);

    config
        .relay
        .validate()
        .context("invalid relay configuration")?;

    Ok(config)
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{} has invalid value {:?}", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("{} has invalid value {:?}", key, value),
    }
}
