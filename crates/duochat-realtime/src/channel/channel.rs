//! Single channel with its member sessions.

use std::collections::HashSet;

use duochat_core::types::ConnectionId;

/// The member sessions of one channel. The registry keys it by name.
#[derive(Debug, Clone, Default)]
pub struct Channel {
    members: HashSet<ConnectionId>,
}

impl Channel {

    /// Adds a member. Returns `false` if it was already present.
    pub fn join(&mut self, conn_id: ConnectionId) -> bool {
        self.members.insert(conn_id)
    }

    /// Removes a member.
    pub fn leave(&mut self, conn_id: ConnectionId) -> bool {
        self.members.remove(&conn_id)
    }

    pub fn contains(&self, conn_id: ConnectionId) -> bool {
        self.members.contains(&conn_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns all member connection IDs.
    pub fn get_members(&self) -> Vec<ConnectionId> {
        self.members.iter().copied().collect()
    }
}
