//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use duochat_core::config::AppConfig;
use duochat_realtime::server::RealtimeEngine;

/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Real-time engine
    pub realtime: Arc<RealtimeEngine>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, realtime: Arc<RealtimeEngine>) -> Self {
        Self { config, realtime }
    }
}
