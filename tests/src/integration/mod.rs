//! Cross-crate flows: relay service, session registry and signal client.

pub mod fixtures;

mod protocol_edges;
mod service;
