//! Client errors.

use tokio_tungstenite::tungstenite;

/// Errors from the signaling client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("undecodable envelope: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// Relay-originated envelope without the `src` it must carry
    #[error("`{0}` envelope has no src")]
    MissingSource(String),

    #[error("connection closed")]
    Closed,
}
