//! Channel fan-out for message and typing events.

pub mod message;
pub mod typing;

use std::sync::Arc;

use duochat_core::types::ConnectionId;

use crate::channel::registry::ChannelRegistry;
use crate::connection::pool::ConnectionPool;
use crate::message::serializer;
use crate::message::types::ServerEvent;
use crate::metrics::EngineMetrics;

pub use message::{MessageRelay, RelayOutcome};
pub use typing::TypingRelay;

/// Delivers one event to every member of a channel except the originating
/// session. The event is encoded once per fan-out.
#[derive(Debug, Clone)]
pub struct ChannelFanout {
    pool: Arc<ConnectionPool>,
    channels: Arc<ChannelRegistry>,
    metrics: Arc<EngineMetrics>,
}

impl ChannelFanout {
    pub fn new(
        pool: Arc<ConnectionPool>,
        channels: Arc<ChannelRegistry>,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            pool,
            channels,
            metrics,
        }
    }

    /// Returns the number of sessions the event was queued for.
    pub fn to_channel(&self, channel: &str, except: ConnectionId, event: &ServerEvent) -> usize {
        let targets: Vec<_> = self
            .channels
            .members(channel)
            .into_iter()
            .filter(|conn_id| *conn_id != except)
            .filter_map(|conn_id| self.pool.get(&conn_id))
            .collect();

        if targets.is_empty() {
            return 0;
        }
        let Some(frame) = serializer::encode(event) else {
            return 0;
        };

        let sent = targets
            .iter()
            .filter(|handle| handle.send(frame.clone()))
            .count();
        self.metrics.record_delivery(targets.len(), sent);
        sent
    }
}
