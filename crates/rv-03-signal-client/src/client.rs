//! WebSocket client for the relay signaling protocol.

use crate::error::ClientError;
use crate::events::{PeerEvent, Welcome, ANSWER_FIELD, ICE_FIELD, OFFER_FIELD};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use rv_01_session_registry::SessionId;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// A connected relay session, seen from the client side.
pub struct SignalClient {
    id: SessionId,
    sink: SplitSink<WsStream, Message>,
    stream: SplitStream<WsStream>,
    /// Events received before the welcome
    pending: VecDeque<PeerEvent>,
}

impl SignalClient {
    /// Connect to `url` and wait for the relay's welcome.
    ///
    /// Events that overtake the welcome (an `addPeer` from a session joining
    /// at the same moment) are kept and returned first by [`next_event`].
    ///
    /// [`next_event`]: SignalClient::next_event
    pub async fn connect(url: &str) -> Result<(Self, Welcome), ClientError> {
        let (socket, _response) = connect_async(url).await?;
        let (sink, mut stream) = socket.split();

        let mut pending = VecDeque::new();
        let welcome = loop {
            match read_event(&mut stream).await? {
                Some(PeerEvent::Welcome(welcome)) => break welcome,
                Some(event) => pending.push_back(event),
                None => return Err(ClientError::Closed),
            }
        };

        debug!(
            id = %welcome.id,
            peers = welcome.peers.len(),
            early = pending.len(),
            "Joined relay"
        );

        let client = Self {
            id: welcome.id.clone(),
            sink,
            stream,
            pending,
        };
        Ok((client, welcome))
    }

    /// Identity the relay assigned to this client
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub async fn signal_offer(
        &mut self,
        peer: &SessionId,
        offer: Value,
    ) -> Result<(), ClientError> {
        self.signal(peer, "offer", OFFER_FIELD, offer).await
    }

    pub async fn signal_answer(
        &mut self,
        peer: &SessionId,
        answer: Value,
    ) -> Result<(), ClientError> {
        self.signal(peer, "answer", ANSWER_FIELD, answer).await
    }

    pub async fn signal_ice(
        &mut self,
        peer: &SessionId,
        candidate: Value,
    ) -> Result<(), ClientError> {
        self.signal(peer, "ice", ICE_FIELD, candidate).await
    }

    /// Send an arbitrary envelope. The relay forwards it if it names a known `target`.
    pub async fn send_raw(&mut self, envelope: Value) -> Result<(), ClientError> {
        self.send_text(envelope.to_string()).await
    }

    /// Send a raw text frame, bypassing JSON encoding.
    pub async fn send_text(&mut self, text: impl Into<String>) -> Result<(), ClientError> {
        self.sink.send(Message::text(text.into())).await?;
        Ok(())
    }

    /// Next event from the relay. `None` once the relay closes the connection.
    ///
    /// Envelopes that lack a required `src` are logged and skipped.
    pub async fn next_event(&mut self) -> Result<Option<PeerEvent>, ClientError> {
        if let Some(event) = self.pending.pop_front() {
            return Ok(Some(event));
        }
        read_event(&mut self.stream).await
    }

    /// Close the connection. The relay then announces our departure.
    pub async fn close(mut self) -> Result<(), ClientError> {
        self.sink.close().await?;
        Ok(())
    }

    async fn signal(
        &mut self,
        peer: &SessionId,
        kind: &str,
        field: &str,
        payload: Value,
    ) -> Result<(), ClientError> {
        let mut envelope = Map::new();
        envelope.insert("type".into(), Value::String(kind.to_string()));
        envelope.insert("target".into(), Value::String(peer.clone().into_string()));
        envelope.insert(field.into(), payload);
        self.send_raw(Value::Object(envelope)).await
    }
}

async fn read_event(stream: &mut SplitStream<WsStream>) -> Result<Option<PeerEvent>, ClientError> {
    loop {
        let Some(text) = next_text(stream).await? else {
            return Ok(None);
        };

        match PeerEvent::decode(&text) {
            Ok(event) => return Ok(Some(event)),
            Err(ClientError::MissingSource(kind)) => {
                warn!(kind = %kind, "Dropping envelope without src");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Next text payload, skipping control frames. `None` on close.
async fn next_text(stream: &mut SplitStream<WsStream>) -> Result<Option<String>, ClientError> {
    while let Some(message) = stream.next().await {
        match message? {
            Message::Text(text) => return Ok(Some(text.as_str().to_string())),
            Message::Binary(bytes) => {
                let text = String::from_utf8(bytes.to_vec())
                    .map_err(|_| ClientError::Malformed("binary frame is not UTF-8".into()))?;
                return Ok(Some(text));
            }
            Message::Close(_) => return Ok(None),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }
    Ok(None)
}
