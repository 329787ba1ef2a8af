//! Reverse index: which channels each session has joined.

use std::collections::HashSet;

use dashmap::DashMap;

use duochat_core::types::ConnectionId;

/// Tracks connection-to-channel mappings so a closing session can leave
/// everything it joined.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    conn_to_channels: DashMap<ConnectionId, HashSet<String>>,
}

impl MembershipIndex {
    /// Records a membership.
    pub fn add(&self, conn_id: ConnectionId, channel: String) {
        self.conn_to_channels
            .entry(conn_id)
            .or_default()
            .insert(channel);
    }

    /// Removes a membership.
    pub fn remove(&self, conn_id: ConnectionId, channel: &str) {
        if let Some(mut channels) = self.conn_to_channels.get_mut(&conn_id) {
            channels.remove(channel);
        }
        self.conn_to_channels
            .remove_if(&conn_id, |_, channels| channels.is_empty());
    }

    /// Removes and returns every membership of a connection.
    pub fn remove_all(&self, conn_id: ConnectionId) -> HashSet<String> {
        self.conn_to_channels
            .remove(&conn_id)
            .map(|(_, channels)| channels)
            .unwrap_or_default()
    }
}
