//! Client error type.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by [`ChatClient`](crate::ChatClient).
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("WebSocket connect failed: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("connection closed")]
    Closed,

    #[error("no event within {0:?}")]
    Timeout(Duration),
}
