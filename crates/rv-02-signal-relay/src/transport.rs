//! WebSocket adapter for the channel ports.
//!
//! An upgraded socket is split in two. The read half becomes a
//! [`WsSource`]. The write half is owned by a writer task that drains a
//! bounded outbox; the outbox sender is the session's [`SignalSink`] and is
//! what the registry hands to other sessions.
//!
//! The writer task stops once every sender is dropped (the session departed
//! and no other handler still holds a clone) or the socket refuses a write.
//!
//! [`SignalSink`]: crate::ports::SignalSink

use crate::ports::{ChannelError, Inbound, SignalSource};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitStream;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Read half of a WebSocket connection
pub struct WsSource {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl SignalSource for WsSource {
    async fn recv(&mut self) -> Result<Inbound, ChannelError> {
        loop {
            let Some(result) = self.stream.next().await else {
                return Ok(Inbound::Closed);
            };

            match result {
                Ok(Message::Text(text)) => return Ok(Inbound::Text(text)),
                Ok(Message::Binary(data)) => {
                    return String::from_utf8(data)
                        .map(Inbound::Text)
                        .map_err(|_| ChannelError::InvalidUtf8);
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => continue,
                Ok(Message::Close(_)) => return Ok(Inbound::Closed),
                Err(e) => return Err(ChannelError::Transport(e.to_string())),
            }
        }
    }
}

/// Split an upgraded socket into an outbox sender and a source, spawning
/// the writer task that feeds the socket.
pub fn split_socket(
    socket: WebSocket,
    outbound_buffer: usize,
) -> (mpsc::Sender<String>, WsSource) {
    let (mut sink, stream) = socket.split();
    let (outbox, mut pending) = mpsc::channel::<String>(outbound_buffer);

    tokio::spawn(async move {
        while let Some(text) = pending.recv().await {
            if let Err(e) = sink.send(Message::Text(text)).await {
                debug!(error = %e, "WebSocket writer stopped");
                break;
            }
        }
        let _ = sink.close().await;
    });

    (outbox, WsSource { stream })
}
