//! Channel registry: every channel with at least one member.

use dashmap::DashMap;
use tracing::debug;

use duochat_core::types::ConnectionId;

use super::channel::Channel;
use super::membership::MembershipIndex;

/// Registry of channels and their member sessions.
///
/// Channels are created on first join and dropped once empty. Joins are
/// idempotent.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel name → Channel.
    channels: DashMap<String, Channel>,
    /// Reverse index for `leave_all`.
    memberships: MembershipIndex,
}

impl ChannelRegistry {
    /// Creates a new channel registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `conn_id` to `channel`. Returns `false` if it was already a member.
    pub fn join(&self, channel: &str, conn_id: ConnectionId) -> bool {
        let joined = self
            .channels
            .entry(channel.to_string())
            .or_insert_with(Channel::default)
            .join(conn_id);

        if joined {
            self.memberships.add(conn_id, channel.to_string());
            debug!(conn_id = %conn_id, channel = %channel, "Joined channel");
        }
        joined
    }

    /// Removes `conn_id` from `channel`.
    pub fn leave(&self, channel: &str, conn_id: ConnectionId) {
        if let Some(mut entry) = self.channels.get_mut(channel) {
            entry.leave(conn_id);
        }
        self.channels.remove_if(channel, |_, ch| ch.is_empty());
        self.memberships.remove(conn_id, channel);
    }

    /// Removes `conn_id` from every channel it joined.
    pub fn leave_all(&self, conn_id: ConnectionId) {
        let channels = self.memberships.remove_all(conn_id);
        for name in &channels {
            if let Some(mut entry) = self.channels.get_mut(name) {
                entry.leave(conn_id);
            }
            self.channels.remove_if(name, |_, ch| ch.is_empty());
        }
        if !channels.is_empty() {
            debug!(conn_id = %conn_id, count = channels.len(), "Left all channels");
        }
    }

    /// Member sessions of a channel.
    pub fn members(&self, channel: &str) -> Vec<ConnectionId> {
        self.channels
            .get(channel)
            .map(|ch| ch.get_members())
            .unwrap_or_default()
    }

    pub fn is_member(&self, channel: &str, conn_id: ConnectionId) -> bool {
        self.channels
            .get(channel)
            .is_some_and(|ch| ch.contains(conn_id))
    }

    /// Returns total number of non-empty channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
