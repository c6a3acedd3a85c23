//! # Relay Runtime
//!
//! Startup glue for the rendezvous relay binary: configuration loading,
//! log setup and the CLI surface.

pub mod cli;
pub mod config;
pub mod telemetry;

pub use cli::Args;
pub use config::{load, LoggingConfig, RuntimeConfig};
