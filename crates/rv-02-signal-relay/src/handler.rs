//! Per-connection relay handler.
//!
//! Each connection runs one [`RelaySession`] through a fixed lifecycle:
//!
//! ```text
//! Connecting ──announce──→ Active ──route loop──→ Closing ──depart──→ Closed
//! ```
//!
//! - **Announce**: allocate an identity, register self while snapshotting the
//!   existing peers, send `welcome`, then `addPeer` to every snapshotted peer.
//! - **Route loop**: forward each inbound envelope to its `target` with `src`
//!   stamped. Routing misses and malformed envelopes are dropped; only
//!   end-of-stream or a transport fault leaves the loop.
//! - **Depart**: deregister while snapshotting the remaining peers, send each
//!   a `removePeer`.
//!
//! Broadcast sends are isolated per peer: one failing peer never stops the
//! others from being notified.

use crate::domain::config::DEFAULT_MAX_MESSAGE_SIZE;
use crate::domain::envelope::{Envelope, RoutedEnvelope};
use crate::ports::{ChannelError, Inbound, SignalSink, SignalSource};
use rv_01_session_registry::{SessionId, SessionRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle state of a session. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SessionState {
    Connecting,
    Active,
    Closing,
    Closed,
}

/// Why the route loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoopExit {
    EndOfStream,
    TransportFault(ChannelError),
}

/// One relay session bound to a shared registry.
pub struct RelaySession<K: SignalSink> {
    registry: Arc<SessionRegistry<K>>,
    session_id: SessionId,
    /// Outbound handle for this connection (a clone sits in the registry)
    outbox: K,
    state: SessionState,
    max_message_size: usize,
}

impl<K: SignalSink> RelaySession<K> {
    pub fn new(registry: Arc<SessionRegistry<K>>, outbox: K) -> Self {
        Self::with_max_message_size(registry, outbox, DEFAULT_MAX_MESSAGE_SIZE)
    }

    pub fn with_max_message_size(
        registry: Arc<SessionRegistry<K>>,
        outbox: K,
        max_message_size: usize,
    ) -> Self {
        let session_id = registry.new_identity();
        Self {
            registry,
            session_id,
            outbox,
            state: SessionState::Connecting,
            max_message_size,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session from connect to close.
    ///
    /// Never fails: every fault is classified, logged and ends in departure.
    pub async fn run<S: SignalSource>(mut self, mut source: S) {
        self.announce().await;

        match self.route_loop(&mut source).await {
            LoopExit::EndOfStream => {
                info!(session_id = %self.session_id, "Session disconnected");
            }
            LoopExit::TransportFault(e) => {
                warn!(session_id = %self.session_id, error = %e, "Session lost");
            }
        }

        self.depart().await;
    }

    fn transition(&mut self, next: SessionState) {
        debug_assert!(next > self.state, "session state moved backwards");
        debug!(
            session_id = %self.session_id,
            from = ?self.state,
            to = ?next,
            "Session state change"
        );
        self.state = next;
    }

    /// Connecting → Active
    async fn announce(&mut self) {
        let peers = self
            .registry
            .register(self.session_id.clone(), self.outbox.clone());

        info!(
            session_id = %self.session_id,
            peers = peers.len(),
            "Session connected"
        );

        let welcome = Envelope::Welcome {
            id: self.session_id.clone(),
            peers: peers.clone(),
        };
        if let Err(e) = self.outbox.send(welcome.encode()).await {
            warn!(session_id = %self.session_id, error = %e, "Failed to send welcome");
        }

        let added = Envelope::AddPeer {
            src: self.session_id.clone(),
        };
        self.broadcast(&peers, &added).await;

        self.transition(SessionState::Active);
    }

    /// Active → Closing
    async fn route_loop<S: SignalSource>(&mut self, source: &mut S) -> LoopExit {
        let exit = loop {
            match source.recv().await {
                Ok(Inbound::Text(text)) => self.route(&text).await,
                Ok(Inbound::Closed) => break LoopExit::EndOfStream,
                Err(e) => break LoopExit::TransportFault(e),
            }
        };

        self.transition(SessionState::Closing);
        exit
    }

    /// Route a single inbound frame. Never ends the session.
    async fn route(&self, text: &str) {
        if text.len() > self.max_message_size {
            warn!(
                session_id = %self.session_id,
                size = text.len(),
                max = self.max_message_size,
                "Message exceeds size limit, dropped"
            );
            return;
        }

        let routed = match RoutedEnvelope::parse(text) {
            Ok(routed) => routed,
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Dropped malformed envelope");
                return;
            }
        };

        debug!(
            session_id = %self.session_id,
            target = %routed.target,
            kind = %routed.kind,
            "Routing envelope"
        );

        let Some(target_channel) = self.registry.get(&routed.target) else {
            warn!(
                session_id = %self.session_id,
                target = %routed.target,
                kind = %routed.kind,
                "Failed to find target session"
            );
            return;
        };

        let target = routed.target.clone();
        let forwarded = routed.into_forward(self.session_id.clone());
        if let Err(e) = target_channel.send(forwarded.encode()).await {
            warn!(
                session_id = %self.session_id,
                target = %target,
                kind = %forwarded.kind(),
                error = %e,
                "Failed to deliver envelope"
            );
        }
    }

    /// Closing → Closed
    async fn depart(&mut self) {
        let remaining = self.registry.deregister(&self.session_id);

        let removed = Envelope::RemovePeer {
            src: self.session_id.clone(),
        };
        self.broadcast(&remaining, &removed).await;

        self.transition(SessionState::Closed);
    }

    /// Best-effort delivery of one envelope to each listed peer.
    async fn broadcast(&self, peers: &[SessionId], envelope: &Envelope) {
        let text = envelope.encode();

        for peer in peers {
            let Some(channel) = self.registry.get(peer) else {
                debug!(
                    session_id = %self.session_id,
                    peer = %peer,
                    kind = envelope.kind(),
                    "Peer left before notification"
                );
                continue;
            };

            if let Err(e) = channel.send(text.clone()).await {
                warn!(
                    session_id = %self.session_id,
                    peer = %peer,
                    kind = envelope.kind(),
                    error = %e,
                    "Failed to notify peer"
                );
            }
        }
    }
}
