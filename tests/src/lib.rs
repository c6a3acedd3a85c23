//! # Rendezvous Relay Test Suite
//!
//! End-to-end tests that run the relay on an ephemeral port and drive it
//! over real WebSocket connections.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Registry and envelope benchmarks
//! └── src/integration/
//!     ├── fixtures.rs       # Relay startup, raw and typed peers
//!     ├── relay_flows.rs    # Announce, routing, departure
//!     ├── protocol_edges.rs # Malformed, oversized and faulty frames
//!     └── service.rs        # Health endpoint, custom path, shutdown
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p rv-tests
//! cargo bench -p rv-tests
//! ```

#![allow(dead_code)]

pub mod integration;
