//! Relay service - listener, router and session spawning.
//!
//! Serves two routes on one listener:
//! - `GET {ws_path}`: WebSocket upgrade, one [`RelaySession`] per connection
//! - `GET /health`: liveness plus the current session count

use crate::domain::config::{RelayConfig, HEALTH_PATH};
use crate::domain::error::{RelayError, RelayResult};
use crate::handler::RelaySession;
use crate::transport::split_socket;
use axum::{
    extract::{ws::WebSocket, ws::WebSocketUpgrade, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rv_01_session_registry::SessionRegistry;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Registry type used by the WebSocket relay
pub type RelayRegistry = SessionRegistry<mpsc::Sender<String>>;

/// Bound relay service, ready to serve
pub struct RelayService {
    config: RelayConfig,
    registry: Arc<RelayRegistry>,
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl RelayService {
    /// Validate `config` and bind the listener with a fresh registry
    pub async fn bind(config: RelayConfig) -> RelayResult<Self> {
        Self::bind_with_registry(config, Arc::new(RelayRegistry::new())).await
    }

    /// Validate `config` and bind the listener around an existing registry
    pub async fn bind_with_registry(
        config: RelayConfig,
        registry: Arc<RelayRegistry>,
    ) -> RelayResult<Self> {
        config.validate()?;

        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(bind_addr)
            .await
            .map_err(|e| RelayError::Bind(format!("{}: {}", bind_addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| RelayError::Bind(e.to_string()))?;

        Ok(Self {
            config,
            registry,
            listener,
            local_addr,
        })
    }

    /// Actual bound address (resolves port 0)
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> Arc<RelayRegistry> {
        Arc::clone(&self.registry)
    }

    /// Serve until `shutdown` resolves
    pub async fn run<F>(self, shutdown: F) -> RelayResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();

        info!(
            addr = %self.local_addr,
            path = %self.config.ws_path,
            "Relay listening"
        );

        let result = axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown)
            .await;

        match result {
            Ok(()) => {
                info!("Relay stopped");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Relay server error");
                Err(RelayError::Serve(e.to_string()))
            }
        }
    }

    /// Serve on a background task, returning a handle to stop it
    pub fn spawn(self) -> RelayHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let local_addr = self.local_addr;
        let registry = self.registry();

        let task = tokio::spawn(self.run(async move {
            let _ = shutdown_rx.await;
        }));

        RelayHandle {
            local_addr,
            registry,
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    fn build_router(&self) -> Router {
        let state = AppState {
            registry: Arc::clone(&self.registry),
            max_message_size: self.config.max_message_size,
            outbound_buffer: self.config.outbound_buffer,
        };

        Router::new()
            .route(&self.config.ws_path, get(ws_upgrade))
            .route(HEALTH_PATH, get(health_check))
            .with_state(state)
    }
}

/// Handle to a relay running on a background task
pub struct RelayHandle {
    local_addr: SocketAddr,
    registry: Arc<RelayRegistry>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<RelayResult<()>>,
}

impl RelayHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn registry(&self) -> Arc<RelayRegistry> {
        Arc::clone(&self.registry)
    }

    /// Stop accepting connections and wait for the listener to finish
    pub async fn shutdown(mut self) -> RelayResult<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| RelayError::Serve(e.to_string()))?
    }
}

/// Application state shared across handlers
#[derive(Clone)]
struct AppState {
    registry: Arc<RelayRegistry>,
    max_message_size: usize,
    outbound_buffer: usize,
}

async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_session(state, socket))
}

async fn serve_session(state: AppState, socket: WebSocket) {
    let (outbox, source) = split_socket(socket, state.outbound_buffer);
    let session =
        RelaySession::with_max_message_size(state.registry, outbox, state.max_message_size);
    session.run(source).await;
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "sessions": state.registry.len(),
    }))
}
