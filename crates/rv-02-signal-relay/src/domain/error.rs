//! Service-level errors.
//!
//! Per-connection problems (routing misses, malformed envelopes, send
//! failures) are logged by the handler and never surface here. Only failures
//! that stop the whole relay do.

use crate::domain::config::ConfigError;

/// Relay service error
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Server socket bind error
    #[error("server bind error: {0}")]
    Bind(String),

    /// Listener failed while serving
    #[error("server error: {0}")]
    Serve(String),
}

pub type RelayResult<T> = Result<T, RelayError>;
