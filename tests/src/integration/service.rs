//! # Service Surface
//!
//! The HTTP side of the relay: health endpoint, configurable WebSocket path
//! and shutdown.

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use rv_02_signal_relay::{RelayConfig, RelayRegistry, RelayService};
    use rv_03_signal_client::SignalClient;
    use serde_json::{json, Value};
    use std::sync::Arc;

    async fn health(addr: std::net::SocketAddr) -> Value {
        reqwest::get(format!("http://{}/health", addr))
            .await
            .expect("health request failed")
            .json()
            .await
            .expect("health body is not JSON")
    }

    #[tokio::test]
    async fn test_health_reports_session_count() {
        let relay = start_relay().await;
        let addr = relay.local_addr();
        assert_eq!(health(addr).await, json!({"status": "ok", "sessions": 0}));

        let (_a, _) = join(&relay).await;
        let (_b, _) = join(&relay).await;
        wait_for_sessions(&relay, 2).await;

        assert_eq!(health(addr).await, json!({"status": "ok", "sessions": 2}));
    }

    #[tokio::test]
    async fn test_relay_serves_an_injected_registry() {
        let registry = Arc::new(RelayRegistry::new());
        registry.new_identity();
        registry.new_identity();

        let relay = RelayService::bind_with_registry(test_config(), Arc::clone(&registry))
            .await
            .unwrap()
            .spawn();

        let (client, welcome) = join(&relay).await;
        assert_eq!(welcome.id.as_str(), "3");
        assert!(registry.contains(&welcome.id));
        assert_eq!(registry.list(), vec![welcome.id.clone()]);

        client.close().await.unwrap();
        wait_for_sessions(&relay, 0).await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_custom_ws_path() {
        let config = RelayConfig {
            ws_path: "/signal".to_string(),
            ..test_config()
        };
        let relay = start_relay_with(config).await;
        let addr = relay.local_addr();

        let (_client, welcome) = SignalClient::connect(&format!("ws://{}/signal", addr))
            .await
            .unwrap();
        assert_eq!(welcome.id.as_str(), "1");

        // The default path is not served
        assert!(SignalClient::connect(&format!("ws://{}/", addr)).await.is_err());
    }

    #[tokio::test]
    async fn test_shutdown_stops_accepting() {
        let relay = start_relay().await;
        let url = ws_url(&relay);

        relay.shutdown().await.unwrap();

        assert!(SignalClient::connect(&url).await.is_err());
    }
}
