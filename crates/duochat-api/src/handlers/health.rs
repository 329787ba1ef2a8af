//! Health check handler.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Open WebSocket sessions, identified or not.
    pub connections: usize,
    /// Identities in the presence registry.
    pub online_users: usize,
    /// Channels with at least one member.
    pub channels: usize,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        connections: state.realtime.pool.connection_count(),
        online_users: state.realtime.registry.len(),
        channels: state.realtime.channels.channel_count(),
    })
}
