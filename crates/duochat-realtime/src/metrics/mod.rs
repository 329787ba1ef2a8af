//! Realtime engine metrics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Engine-level counters.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Sessions ever opened
    pub connections_total: AtomicU64,
    /// Sessions currently open
    pub connections_active: AtomicU64,
    /// Inbound frames accepted
    pub events_received: AtomicU64,
    /// Inbound frames dropped (malformed, or sent before `setup`)
    pub events_dropped: AtomicU64,
    /// Outbound frames queued
    pub frames_sent: AtomicU64,
    /// Outbound frames dropped (full or closed queue)
    pub frames_dropped: AtomicU64,
    /// `message-received` deliveries
    pub messages_relayed: AtomicU64,
    /// `typing` / `stop-typing` deliveries
    pub typing_relayed: AtomicU64,
    /// `online-users` broadcasts
    pub presence_broadcasts: AtomicU64,
}

impl EngineMetrics {
    /// Create new zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new session
    pub fn record_connect(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.connections_active.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed session
    pub fn record_disconnect(&self) {
        self.connections_active.fetch_sub(1, Ordering::Relaxed);
    }

    /// Record an accepted inbound frame
    pub fn record_received(&self) {
        self.events_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped inbound frame
    pub fn record_dropped(&self) {
        self.events_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a fan-out: `sent` frames queued out of `attempted`.
    pub fn record_delivery(&self, attempted: usize, sent: usize) {
        self.frames_sent.fetch_add(sent as u64, Ordering::Relaxed);
        self.frames_dropped
            .fetch_add(attempted.saturating_sub(sent) as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            connections_total: self.connections_total.load(Ordering::Relaxed),
            connections_active: self.connections_active.load(Ordering::Relaxed),
            events_received: self.events_received.load(Ordering::Relaxed),
            events_dropped: self.events_dropped.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            messages_relayed: self.messages_relayed.load(Ordering::Relaxed),
            typing_relayed: self.typing_relayed.load(Ordering::Relaxed),
            presence_broadcasts: self.presence_broadcasts.load(Ordering::Relaxed),
        }
    }
}

/// Serializable metrics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub connections_total: u64,
    pub connections_active: u64,
    pub events_received: u64,
    pub events_dropped: u64,
    pub frames_sent: u64,
    pub frames_dropped: u64,
    pub messages_relayed: u64,
    pub typing_relayed: u64,
    pub presence_broadcasts: u64,
}
