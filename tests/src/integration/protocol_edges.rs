//! # Protocol Edges
//!
//! Frames the relay must survive: undecodable JSON, envelopes without a
//! usable target, oversized frames, binary frames and broken encodings.
//! Bad envelopes are dropped while the sender stays connected; a broken
//! transport ends the session with a normal departure.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use rv_02_signal_relay::RelayConfig;
    use serde_json::json;

    /// Two raw peers "1" and "2" with the join traffic already consumed
    async fn connected_pair(url: &str) -> (RawPeer, RawPeer) {
        let mut a = RawPeer::connect(url).await;
        a.recv_json().await;
        let mut b = RawPeer::connect(url).await;
        b.recv_json().await;
        a.recv_json().await;
        (a, b)
    }

    #[tokio::test]
    async fn test_malformed_envelopes_are_dropped() {
        let relay = start_relay().await;
        let (mut a, mut b) = connected_pair(&ws_url(&relay)).await;

        a.send_text("{not json").await;
        a.send_json(json!(["offer", "2"])).await;
        a.send_json(json!({"type": "offer", "sdp": "no target"})).await;
        a.send_json(json!({"type": "offer", "target": 2})).await;
        a.send_json(json!({"target": "2", "sdp": "no type"})).await;
        b.assert_silent().await;

        a.send_json(json!({"type": "offer", "target": "2", "sdp": "ok"})).await;
        assert_eq!(
            b.recv_json().await,
            json!({"type": "offer", "src": "1", "sdp": "ok"})
        );
        assert_eq!(relay.registry().len(), 2);
    }

    #[tokio::test]
    async fn test_oversized_frame_is_dropped() {
        let config = RelayConfig {
            max_message_size: 128,
            ..test_config()
        };
        let relay = start_relay_with(config).await;
        let (mut a, mut b) = connected_pair(&ws_url(&relay)).await;

        let padding = "x".repeat(256);
        a.send_json(json!({"type": "offer", "target": "2", "sdp": padding}))
            .await;
        b.assert_silent().await;

        a.send_json(json!({"type": "offer", "target": "2", "sdp": "small"}))
            .await;
        assert_eq!(
            b.recv_json().await,
            json!({"type": "offer", "src": "1", "sdp": "small"})
        );
    }

    #[tokio::test]
    async fn test_binary_utf8_frame_is_routed() {
        let relay = start_relay().await;
        let (mut a, mut b) = connected_pair(&ws_url(&relay)).await;

        let envelope = json!({"type": "ice", "target": "2", "candidate": "c"});
        a.send_binary(envelope.to_string().into_bytes()).await;

        assert_eq!(
            b.recv_json().await,
            json!({"type": "ice", "src": "1", "candidate": "c"})
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8_closes_the_session() {
        let relay = start_relay().await;
        let (mut a, mut b) = connected_pair(&ws_url(&relay)).await;

        b.send_binary(vec![0xff, 0xfe, 0xfd]).await;

        assert_eq!(a.recv_json().await, json!({"type": "removePeer", "src": "2"}));
        wait_for_sessions(&relay, 1).await;
    }
}
