//! Idle-session reaper.

use std::sync::Arc;
use std::time::Duration;

use tokio::time;

use duochat_core::config::RealtimeConfig;

use super::handle::ConnectionHandle;

/// Heartbeat configuration
#[derive(Debug, Clone)]
pub struct HeartbeatConfig {
    /// How often idleness is checked
    pub check_interval: Duration,
    /// Silence after which the session is closed
    pub idle_timeout: Duration,
}

impl HeartbeatConfig {
    /// Derives the heartbeat from realtime settings; `None` when the idle
    /// timeout is disabled.
    pub fn from_config(config: &RealtimeConfig) -> Option<Self> {
        let idle_timeout = config.idle_timeout()?;
        let check_interval = config
            .ping_interval()
            .unwrap_or(idle_timeout)
            .min(idle_timeout);
        Some(Self {
            check_interval,
            idle_timeout,
        })
    }
}

/// Run the idle check for a connection.
///
/// Any inbound frame (pongs included) refreshes the handle; a session that
/// stays silent past `idle_timeout` is closed. Ends when the handle closes.
pub async fn run_heartbeat(handle: Arc<ConnectionHandle>, config: HeartbeatConfig) {
    let mut interval = time::interval(config.check_interval);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = handle.closed() => break,
            _ = interval.tick() => {}
        }

        let idle = handle.idle_for();
        if idle > config.idle_timeout {
            tracing::warn!(
                conn_id = %handle.id,
                idle_ms = idle.as_millis() as u64,
                "Connection idle timeout"
            );
            handle.close();
            break;
        }
    }

    tracing::debug!(conn_id = %handle.id, "Heartbeat loop ended");
}
