//! # Channel Ports
//!
//! The relay handler never touches a socket directly. It talks to one
//! connection through two halves:
//!
//! - [`SignalSource`]: yields inbound text frames until end-of-stream.
//! - [`SignalSink`]: a cloneable outbound handle; clones live in the
//!   session registry so other handlers can deliver to this connection.
//!
//! The WebSocket adapter in [`crate::transport`] implements both. Tests drive
//! the handler with plain `tokio::sync::mpsc` channels.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// One step of an inbound channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    /// A complete text frame
    Text(String),
    /// Clean end-of-stream
    Closed,
}

/// Errors from channel I/O.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The other end of the channel is gone
    #[error("channel closed")]
    Closed,
    /// The other end is not draining its queue; the frame was dropped
    #[error("channel full")]
    Full,
    /// Binary frame that is not valid UTF-8 text
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,
    /// Lower-level transport failure
    #[error("transport error: {0}")]
    Transport(String),
}

/// Outbound half of a session channel.
///
/// Implementations must be cheap to clone; every clone addresses the same
/// connection.
#[async_trait]
pub trait SignalSink: Clone + Send + Sync + 'static {
    /// Queue one text frame without waiting on the receiving end.
    ///
    /// A peer that stops reading must not stall the caller: a full queue is
    /// reported as [`ChannelError::Full`] and the frame is dropped.
    async fn send(&self, text: String) -> Result<(), ChannelError>;
}

/// Inbound half of a session channel.
#[async_trait]
pub trait SignalSource: Send {
    /// Wait for the next frame. `Ok(Inbound::Closed)` ends the session
    /// cleanly; `Err` is a transport fault.
    async fn recv(&mut self) -> Result<Inbound, ChannelError>;
}

#[async_trait]
impl SignalSink for mpsc::Sender<String> {
    async fn send(&self, text: String) -> Result<(), ChannelError> {
        self.try_send(text).map_err(|e| match e {
            TrySendError::Full(_) => ChannelError::Full,
            TrySendError::Closed(_) => ChannelError::Closed,
        })
    }
}

#[async_trait]
impl SignalSource for mpsc::Receiver<String> {
    async fn recv(&mut self) -> Result<Inbound, ChannelError> {
        Ok(match mpsc::Receiver::recv(self).await {
            Some(text) => Inbound::Text(text),
            None => Inbound::Closed,
        })
    }
}
