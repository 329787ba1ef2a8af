//! Connection registry: which session currently speaks for each identity.
//!
//! One live session per identity: registering again replaces the earlier
//! entry (last write wins). Identities keep their first-registration order
//! so snapshots are stable across broadcasts.
//!
//! Every mutation publishes the new snapshot while still holding the
//! registry lock, so broadcasts leave in mutation order and the last one a
//! client sees always equals [`ConnectionRegistry::snapshot`].

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, info};

use duochat_core::types::{ConnectionId, UserId};

use crate::presence::broadcaster::PresenceBroadcaster;

/// Identity → session map with presence broadcast on mutation.
#[derive(Debug)]
pub struct ConnectionRegistry {
    entries: Mutex<IndexMap<UserId, ConnectionId>>,
    presence: Arc<PresenceBroadcaster>,
}

impl ConnectionRegistry {
    pub fn new(presence: Arc<PresenceBroadcaster>) -> Self {
        Self {
            entries: Mutex::new(IndexMap::new()),
            presence,
        }
    }

    /// Record `conn_id` as the session for `identity`.
    ///
    /// Returns the session it replaced, if that was a different one.
    pub fn register(&self, identity: UserId, conn_id: ConnectionId) -> Option<ConnectionId> {
        let mut entries = self.entries.lock();
        let previous = entries
            .insert(identity.clone(), conn_id)
            .filter(|prev| *prev != conn_id);

        let snapshot: Vec<UserId> = entries.keys().cloned().collect();
        self.presence.publish(&snapshot);
        drop(entries);

        match previous {
            Some(prev) => info!(
                user_id = %identity,
                conn_id = %conn_id,
                replaced = %prev,
                "Identity re-registered on a new session"
            ),
            None => debug!(user_id = %identity, conn_id = %conn_id, "Identity registered"),
        }
        previous
    }

    /// Remove every entry whose session is `conn_id`.
    ///
    /// Entries already taken over by a newer session are left alone. The
    /// snapshot is broadcast even when nothing was removed. Returns the
    /// identities that went offline.
    pub fn unregister(&self, conn_id: ConnectionId) -> Vec<UserId> {
        let mut entries = self.entries.lock();
        let mut removed = Vec::new();
        entries.retain(|identity, session| {
            if *session == conn_id {
                removed.push(identity.clone());
                false
            } else {
                true
            }
        });

        let snapshot: Vec<UserId> = entries.keys().cloned().collect();
        self.presence.publish(&snapshot);
        drop(entries);

        for identity in &removed {
            debug!(user_id = %identity, conn_id = %conn_id, "Identity unregistered");
        }
        removed
    }

    /// Current online identities, in first-registration order.
    pub fn snapshot(&self) -> Vec<UserId> {
        self.entries.lock().keys().cloned().collect()
    }

    /// Session currently registered for `identity`.
    pub fn lookup(&self, identity: &UserId) -> Option<ConnectionId> {
        self.entries.lock().get(identity).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
