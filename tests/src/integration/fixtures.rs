//! Shared helpers for end-to-end tests.

use futures::{SinkExt, StreamExt};
use rv_02_signal_relay::{RelayConfig, RelayHandle, RelayService};
use rv_03_signal_client::{PeerEvent, SignalClient, Welcome};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

/// Upper bound for anything that is expected to arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// How long to wait before concluding nothing will arrive
pub const SILENCE_WINDOW: Duration = Duration::from_millis(200);

/// Relay config listening on an ephemeral localhost port
pub fn test_config() -> RelayConfig {
    RelayConfig {
        port: 0,
        ..Default::default()
    }
}

pub async fn start_relay() -> RelayHandle {
    start_relay_with(test_config()).await
}

pub async fn start_relay_with(config: RelayConfig) -> RelayHandle {
    RelayService::bind(config)
        .await
        .expect("relay should bind")
        .spawn()
}

pub fn ws_url(relay: &RelayHandle) -> String {
    format!("ws://{}/", relay.local_addr())
}

/// Connect a typed client and return its welcome
pub async fn join(relay: &RelayHandle) -> (SignalClient, Welcome) {
    timeout(RECV_TIMEOUT, SignalClient::connect(&ws_url(relay)))
        .await
        .expect("connect timed out")
        .expect("connect failed")
}

/// Next event, failing the test on timeout, error or close
pub async fn next_event(client: &mut SignalClient) -> PeerEvent {
    timeout(RECV_TIMEOUT, client.next_event())
        .await
        .expect("timed out waiting for event")
        .expect("client error")
        .expect("relay closed the connection")
}

/// Assert that no event arrives within the silence window
pub async fn assert_silent(client: &mut SignalClient) {
    if let Ok(event) = timeout(SILENCE_WINDOW, client.next_event()).await {
        panic!("expected silence, got {:?}", event);
    }
}

/// Poll until the relay reports `count` live sessions
pub async fn wait_for_sessions(relay: &RelayHandle, count: usize) {
    let registry = relay.registry();
    timeout(RECV_TIMEOUT, async {
        while registry.len() != count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("registry never reached {} sessions", count));
}

/// Untyped peer for checking exact wire output and sending arbitrary frames
pub struct RawPeer {
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl RawPeer {
    pub async fn connect(url: &str) -> Self {
        let (socket, _) = timeout(RECV_TIMEOUT, connect_async(url))
            .await
            .expect("connect timed out")
            .expect("connect failed");
        Self { socket }
    }

    pub async fn send_json(&mut self, value: Value) {
        self.send_text(&value.to_string()).await;
    }

    pub async fn send_text(&mut self, text: &str) {
        self.socket
            .send(Message::text(text.to_string()))
            .await
            .expect("send failed");
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) {
        self.socket
            .send(Message::binary(bytes))
            .await
            .expect("send failed");
    }

    /// Next text frame parsed as JSON
    pub async fn recv_json(&mut self) -> Value {
        timeout(RECV_TIMEOUT, async {
            loop {
                match self.socket.next().await {
                    Some(Ok(Message::Text(text))) => {
                        return serde_json::from_str(text.as_str()).expect("relay sent invalid JSON")
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                    other => panic!("expected text frame, got {:?}", other),
                }
            }
        })
        .await
        .expect("timed out waiting for frame")
    }

    pub async fn assert_silent(&mut self) {
        if let Ok(frame) = timeout(SILENCE_WINDOW, self.socket.next()).await {
            panic!("expected silence, got {:?}", frame);
        }
    }

    /// Drop the TCP connection without a close handshake
    pub fn abort(self) {
        drop(self.socket);
    }
}
