//! Real-time event channel configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound queue capacity. Events beyond it are dropped.
    #[serde(default = "default_outbound_buffer")]
    pub outbound_buffer_size: usize,
    /// Require a valid token in the `setup` event before binding an identity.
    #[serde(default = "default_true")]
    pub require_authenticated_setup: bool,
    /// WebSocket ping interval in seconds (0 disables pings).
    #[serde(default = "default_ping_interval")]
    pub ping_interval_seconds: u64,
    /// Close sessions with no inbound frame for this many seconds (0 disables).
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,
}

impl RealtimeConfig {
    /// Ping interval, `None` when disabled.
    pub fn ping_interval(&self) -> Option<Duration> {
        (self.ping_interval_seconds > 0).then(|| Duration::from_secs(self.ping_interval_seconds))
    }

    /// Idle timeout, `None` when disabled.
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_seconds > 0).then(|| Duration::from_secs(self.idle_timeout_seconds))
    }
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            outbound_buffer_size: default_outbound_buffer(),
            require_authenticated_setup: true,
            ping_interval_seconds: default_ping_interval(),
            idle_timeout_seconds: default_idle_timeout(),
        }
    }
}

fn default_outbound_buffer() -> usize {
    256
}

fn default_true() -> bool {
    true
}

fn default_ping_interval() -> u64 {
    25
}

fn default_idle_timeout() -> u64 {
    60
}
