//! Presence broadcaster: pushes the full online set to every session.

use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::debug;

use duochat_core::types::UserId;

use crate::connection::pool::ConnectionPool;
use crate::message::serializer;
use crate::message::types::ServerEvent;
use crate::metrics::EngineMetrics;

/// Sends `online-users` snapshots to every open session, identified or not.
///
/// Holds no state of its own; the snapshot always comes from the
/// [`ConnectionRegistry`](crate::connection::registry::ConnectionRegistry).
#[derive(Debug)]
pub struct PresenceBroadcaster {
    pool: Arc<ConnectionPool>,
    metrics: Arc<EngineMetrics>,
}

impl PresenceBroadcaster {
    pub fn new(pool: Arc<ConnectionPool>, metrics: Arc<EngineMetrics>) -> Self {
        Self { pool, metrics }
    }

    /// Broadcast a snapshot. Returns the number of sessions it was queued for.
    pub fn publish(&self, online: &[UserId]) -> usize {
        let Some(frame) = serializer::encode(&ServerEvent::OnlineUsers(online.to_vec())) else {
            return 0;
        };

        let targets = self.pool.all_connections();
        let sent = targets
            .iter()
            .filter(|handle| handle.send(frame.clone()))
            .count();

        self.metrics.presence_broadcasts.fetch_add(1, Ordering::Relaxed);
        self.metrics.record_delivery(targets.len(), sent);
        debug!(online = online.len(), sessions = sent, "Published presence snapshot");
        sent
    }
}
