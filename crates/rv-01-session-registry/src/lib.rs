//! # Session Registry
//!
//! **Subsystem ID:** 1
//!
//! In-memory authority mapping session identities to the channel handles of
//! live relay connections. It assigns identities and answers membership
//! queries; it has no knowledge of what travels over the channels.
//!
//! ## Invariants
//!
//! - Identities come from a process-wide counter starting at 1 and are never
//!   reused, so two live sessions never share one.
//! - Every call is atomic in isolation. No transaction spans calls;
//!   `register` and `deregister` fuse the membership change with a snapshot.
//! - `remove` is idempotent.
//!
//! ## Example
//!
//! ```rust
//! use rv_01_session_registry::SessionRegistry;
//!
//! let registry: SessionRegistry<&'static str> = SessionRegistry::new();
//!
//! let first = registry.new_identity();
//! assert_eq!(first.as_str(), "1");
//!
//! // Register and snapshot the others in one step: a newcomer never sees itself.
//! let peers = registry.register(first.clone(), "channel-a");
//! assert!(peers.is_empty());
//! assert_eq!(registry.get(&first), Some("channel-a"));
//!
//! let second = registry.new_identity();
//! assert_eq!(registry.register(second.clone(), "channel-b"), vec![first.clone()]);
//!
//! registry.remove(&first);
//! registry.remove(&first); // no-op
//! assert!(registry.get(&first).is_none());
//! ```

pub mod domain;
pub mod registry;

pub use domain::SessionId;
pub use registry::SessionRegistry;
