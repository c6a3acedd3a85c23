//! # Signal Client
//!
//! **Subsystem ID:** 3
//!
//! Client side of the rendezvous relay. Connects, learns its own identity and
//! the current peers from the welcome, then exchanges negotiation envelopes
//! with named peers.
//!
//! ```rust,no_run
//! use rv_03_signal_client::{PeerEvent, SignalClient};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), rv_03_signal_client::ClientError> {
//! let (mut client, welcome) = SignalClient::connect("ws://127.0.0.1:8514/").await?;
//! for peer in &welcome.peers {
//!     client.signal_offer(peer, json!({"type": "offer", "sdp": "..."})).await?;
//! }
//! while let Some(event) = client.next_event().await? {
//!     if let PeerEvent::Answer { src, .. } = event {
//!         println!("answer from {}", src);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod events;

pub use client::SignalClient;
pub use error::ClientError;
pub use events::{PeerEvent, Welcome};

pub use rv_01_session_registry::SessionId;
