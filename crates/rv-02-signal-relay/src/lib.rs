//! # Signal Relay
//!
//! **Subsystem ID:** 2
//!
//! Rendezvous relay for peer-to-peer connection negotiation. Clients hold a
//! WebSocket open to the relay; the relay names each one, tells existing
//! sessions about newcomers and leavers, and forwards negotiation envelopes
//! (offers, answers, ICE candidates, anything else) to a named target. It
//! never looks inside the payload.
//!
//! ## Architecture
//!
//! ```text
//!  client A ──ws──→ WsSource ──→ RelaySession(A) ──get(B)──→ Registry
//!                                      │                        │
//!                           register / deregister          outbox(B)
//!                                                               │
//!  client B ←──ws── writer task(B) ←────────────────────────────┘
//! ```
//!
//! - **Domain Layer:** envelopes, configuration, errors
//! - **Ports Layer:** [`SignalSource`] / [`SignalSink`] channel traits
//! - **Handler:** per-connection lifecycle state machine
//! - **Adapters:** axum WebSocket transport and the relay service
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rv_02_signal_relay::{RelayConfig, RelayService};
//!
//! # async fn run() -> Result<(), rv_02_signal_relay::RelayError> {
//! let service = RelayService::bind(RelayConfig::default()).await?;
//! service.run(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod domain;
pub mod handler;
pub mod ports;
pub mod service;
pub mod transport;

pub use domain::config::RelayConfig;
pub use domain::envelope::{Envelope, EnvelopeError, RoutedEnvelope};
pub use domain::error::{RelayError, RelayResult};
pub use domain::ConfigError;
pub use handler::{RelaySession, SessionState};
pub use ports::{ChannelError, Inbound, SignalSink, SignalSource};
pub use service::{RelayHandle, RelayRegistry, RelayService};

pub use rv_01_session_registry::{SessionId, SessionRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
