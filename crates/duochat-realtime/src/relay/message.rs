//! Message relay: forwards an already-persisted record to its receiver.

use std::sync::atomic::Ordering;

use tracing::{debug, warn};

use duochat_core::types::{ConnectionId, MessageRecord};

use crate::message::types::ServerEvent;

use super::ChannelFanout;

/// Result of a relay attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Fanned out to the receiver's channel; `recipients` may be zero when
    /// the receiver is offline.
    Delivered { recipients: usize },
    /// The record named no receiver and was dropped.
    MissingReceiver,
}

/// Best-effort delivery of `new-message` records.
///
/// Nothing is stored or retried here: an offline receiver simply sees the
/// message on its next fetch from the persistence layer.
#[derive(Debug, Clone)]
pub struct MessageRelay {
    fanout: ChannelFanout,
}

impl MessageRelay {
    pub fn new(fanout: ChannelFanout) -> Self {
        Self { fanout }
    }

    /// Emits `message-received` to every session in the receiver's channel
    /// except `from`.
    pub fn relay(&self, from: ConnectionId, record: MessageRecord) -> RelayOutcome {
        let Some(receiver) = record.receiver_id() else {
            warn!(conn_id = %from, "Receiver not defined");
            self.fanout.metrics.record_dropped();
            return RelayOutcome::MissingReceiver;
        };

        let message_id = record.get("_id").cloned();
        let recipients = self.fanout.to_channel(
            receiver.as_str(),
            from,
            &ServerEvent::MessageReceived(record),
        );
        self.fanout
            .metrics
            .messages_relayed
            .fetch_add(recipients as u64, Ordering::Relaxed);
        debug!(
            conn_id = %from,
            receiver = %receiver,
            message_id = ?message_id,
            recipients,
            "Relayed message"
        );

        RelayOutcome::Delivered { recipients }
    }
}
