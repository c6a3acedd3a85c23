//! Domain types: envelopes, configuration, errors.

pub mod config;
pub mod envelope;
pub mod error;

pub use config::{ConfigError, RelayConfig};
pub use envelope::{Envelope, EnvelopeError, ForwardedEnvelope, RoutedEnvelope};
pub use error::{RelayError, RelayResult};
