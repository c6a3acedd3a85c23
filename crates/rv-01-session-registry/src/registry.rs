//! Shared session registry.

use crate::domain::SessionId;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Registry of live sessions, keyed by identity.
///
/// Generic over the channel handle `C` so the relay can store whatever
/// outbound handle its transport provides. Handles are cloned out on
/// lookup; the map itself is never exposed.
///
/// # Thread Safety
///
/// Reads and writes are serialized through one lock, so `list` is a true
/// point-in-time snapshot. The identity counter is lock-free.
pub struct SessionRegistry<C> {
    /// Live sessions by identity
    sessions: RwLock<HashMap<SessionId, C>>,
    /// Next identity to hand out
    id_counter: AtomicU64,
}

impl<C: Clone> SessionRegistry<C> {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            id_counter: AtomicU64::new(1),
        }
    }

    /// Allocate the next unused identity. Never blocks, never fails.
    pub fn new_identity(&self) -> SessionId {
        let id_num = self.id_counter.fetch_add(1, Ordering::SeqCst);
        SessionId::from_counter(id_num)
    }

    /// Register `channel` under `id`, replacing any existing entry.
    pub fn add(&self, id: SessionId, channel: C) {
        let (replaced, count) = {
            let mut sessions = self.sessions.write();
            let replaced = sessions.insert(id.clone(), channel).is_some();
            (replaced, sessions.len())
        };

        if replaced {
            warn!(session_id = %id, "Replaced existing session channel");
        }
        debug!(session_id = %id, sessions = count, "Registered session");
    }

    /// Deregister `id`. Removing an unknown identity is a no-op.
    ///
    /// Returns whether an entry was actually removed.
    pub fn remove(&self, id: &SessionId) -> bool {
        let (removed, count) = {
            let mut sessions = self.sessions.write();
            let removed = sessions.remove(id).is_some();
            (removed, sessions.len())
        };

        if removed {
            debug!(session_id = %id, sessions = count, "Removed session");
        }
        removed
    }

    /// Snapshot of all registered identities. Order is unspecified.
    pub fn list(&self) -> Vec<SessionId> {
        self.sessions.read().keys().cloned().collect()
    }

    /// Look up the channel registered under `id`.
    ///
    /// `None` means the session departed or never existed.
    pub fn get(&self, id: &SessionId) -> Option<C> {
        self.sessions.read().get(id).cloned()
    }

    /// Register `channel` under `id` and return every other identity present
    /// at that instant, in one critical section.
    ///
    /// Of two sessions registering concurrently, the later one always sees
    /// the earlier.
    pub fn register(&self, id: SessionId, channel: C) -> Vec<SessionId> {
        let (peers, count) = {
            let mut sessions = self.sessions.write();
            let peers: Vec<SessionId> = sessions
                .keys()
                .filter(|existing| **existing != id)
                .cloned()
                .collect();
            sessions.insert(id.clone(), channel);
            (peers, sessions.len())
        };

        debug!(session_id = %id, sessions = count, "Registered session");
        peers
    }

    /// Deregister `id` and return the identities that remain, in one critical
    /// section.
    pub fn deregister(&self, id: &SessionId) -> Vec<SessionId> {
        let (remaining, removed) = {
            let mut sessions = self.sessions.write();
            let removed = sessions.remove(id).is_some();
            (sessions.keys().cloned().collect::<Vec<_>>(), removed)
        };

        if removed {
            debug!(session_id = %id, sessions = remaining.len(), "Removed session");
        }
        remaining
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().contains_key(id)
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl<C: Clone> Default for SessionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}
