//! Individual WebSocket session handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use duochat_core::types::{ConnectionId, UserId};

use crate::message::serializer;
use crate::message::types::ServerEvent;

/// A handle to a single live session.
///
/// Holds the sender side of the session's bounded outbound queue plus the
/// identity bound by `setup` (absent before).
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// Sender for encoded outbound frames
    sender: mpsc::Sender<String>,
    /// Identity bound by the last successful `setup`
    identity: RwLock<Option<UserId>>,
    /// Last inbound frame
    last_seen: Mutex<Instant>,
    /// Whether the outbound queue is still open
    alive: AtomicBool,
    /// Fired when the server decides to close the session
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            id: ConnectionId::new(),
            sender,
            identity: RwLock::new(None),
            last_seen: Mutex::new(Instant::now()),
            alive: AtomicBool::new(true),
            closed: CancellationToken::new(),
        }
    }

    /// Queue an encoded frame. Never blocks; returns whether it was queued.
    pub fn send(&self, frame: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(frame) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Outbound buffer full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Encode and queue a single event.
    pub fn send_event(&self, event: &ServerEvent) -> bool {
        serializer::encode(event).is_some_and(|frame| self.send(frame))
    }

    /// Identity bound to this session, if `setup` succeeded.
    pub fn identity(&self) -> Option<UserId> {
        self.identity.read().clone()
    }

    /// Bind an identity, replacing any earlier one.
    pub fn bind_identity(&self, identity: UserId) {
        *self.identity.write() = Some(identity);
    }

    /// Whether `setup` has completed on this session.
    pub fn is_registered(&self) -> bool {
        self.identity.read().is_some()
    }

    /// Record inbound activity
    pub fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    /// Time since the last inbound frame
    pub fn idle_for(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Check if the outbound queue is still open and the session not closed
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst) && !self.closed.is_cancelled()
    }

    /// Mark connection as dead
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }

    /// Ask the transport to close this session.
    ///
    /// Frames queued before the call are still flushed by the writer.
    pub fn close(&self) {
        self.closed.cancel();
    }

    /// Whether [`ConnectionHandle::close`] was called
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the session is asked to close
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.closed.cancelled()
    }
}
