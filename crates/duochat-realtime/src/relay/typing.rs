//! Typing relay: ephemeral typing / stop-typing signals.

use std::sync::atomic::Ordering;

use duochat_core::types::ConnectionId;

use crate::message::types::ServerEvent;

use super::ChannelFanout;

/// Forwards typing signals to a channel, excluding the sender's session.
/// Signals carry no payload and are never stored.
#[derive(Debug, Clone)]
pub struct TypingRelay {
    fanout: ChannelFanout,
}

impl TypingRelay {
    pub fn new(fanout: ChannelFanout) -> Self {
        Self { fanout }
    }

    /// Emits `typing` to the channel.
    pub fn start(&self, from: ConnectionId, channel: &str) -> usize {
        self.emit(from, channel, &ServerEvent::Typing)
    }

    /// Emits `stop-typing` to the channel.
    pub fn stop(&self, from: ConnectionId, channel: &str) -> usize {
        self.emit(from, channel, &ServerEvent::StopTyping)
    }

    fn emit(&self, from: ConnectionId, channel: &str, event: &ServerEvent) -> usize {
        let sent = self.fanout.to_channel(channel, from, event);
        self.fanout
            .metrics
            .typing_relayed
            .fetch_add(sent as u64, Ordering::Relaxed);
        sent
    }
}
