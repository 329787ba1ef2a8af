//! Connection manager: session lifecycle and inbound event dispatch.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use duochat_core::error::{AppError, ErrorKind};
use duochat_core::types::ConnectionId;

use crate::channel::registry::ChannelRegistry;
use crate::message::types::{ClientEvent, ServerEvent, SetupPayload};
use crate::metrics::EngineMetrics;
use crate::relay::{MessageRelay, TypingRelay};

use super::authenticator::SetupAuthenticator;
use super::handle::ConnectionHandle;
use super::pool::ConnectionPool;
use super::registry::ConnectionRegistry;

/// Error code sent when the setup credential is missing or invalid.
pub const CODE_UNAUTHORIZED: &str = "UNAUTHORIZED";
/// Error code sent when the setup payload is unusable.
pub const CODE_INVALID_SETUP: &str = "INVALID_SETUP";

/// Owns the session lifecycle: open, dispatch, close.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: Arc<ConnectionPool>,
    channels: Arc<ChannelRegistry>,
    registry: Arc<ConnectionRegistry>,
    message_relay: Arc<MessageRelay>,
    typing_relay: Arc<TypingRelay>,
    authenticator: SetupAuthenticator,
    metrics: Arc<EngineMetrics>,
    buffer_size: usize,
}

impl ConnectionManager {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: Arc<ConnectionPool>,
        channels: Arc<ChannelRegistry>,
        registry: Arc<ConnectionRegistry>,
        message_relay: Arc<MessageRelay>,
        typing_relay: Arc<TypingRelay>,
        authenticator: SetupAuthenticator,
        metrics: Arc<EngineMetrics>,
        buffer_size: usize,
    ) -> Self {
        Self {
            pool,
            channels,
            registry,
            message_relay,
            typing_relay,
            authenticator,
            metrics,
            buffer_size: buffer_size.max(1),
        }
    }

    /// Opens a new, not yet identified session.
    ///
    /// Returns the handle and the receiver the transport drains into the
    /// socket.
    pub fn open(&self) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        let handle = Arc::new(ConnectionHandle::new(tx));

        self.pool.add(handle.clone());
        self.metrics.record_connect();
        info!(conn_id = %handle.id, "WebSocket connection opened");

        (handle, rx)
    }

    /// Tears a session down: leaves every channel, drops its registry
    /// entries and rebroadcasts presence. Safe to call more than once.
    pub fn close(&self, conn_id: &ConnectionId) {
        let Some(handle) = self.pool.remove(conn_id) else {
            return;
        };
        handle.close();

        self.channels.leave_all(*conn_id);
        let offline = self.registry.unregister(*conn_id);
        self.metrics.record_disconnect();

        info!(
            conn_id = %conn_id,
            user_id = ?handle.identity(),
            went_offline = offline.len(),
            "WebSocket connection closed"
        );
    }

    /// Processes one inbound text frame.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Frame from unknown connection");
            return;
        };
        if handle.is_closed() {
            return;
        }
        handle.touch();

        let event: ClientEvent = match serde_json::from_str(raw) {
            Ok(event) => event,
            Err(e) => {
                warn!(conn_id = %conn_id, error = %e, "Dropping malformed frame");
                self.metrics.record_dropped();
                return;
            }
        };
        self.metrics.record_received();

        match event {
            ClientEvent::Setup(payload) => self.handle_setup(&handle, &payload),
            _ if !handle.is_registered() => {
                warn!(conn_id = %conn_id, "Event before setup, dropping");
                self.metrics.record_dropped();
            }
            ClientEvent::JoinChat(channel) => {
                self.channels.join(&channel, handle.id);
            }
            ClientEvent::NewMessage(record) => {
                self.message_relay.relay(handle.id, record);
            }
            ClientEvent::Typing(channel) => {
                self.typing_relay.start(handle.id, &channel);
            }
            ClientEvent::StopTyping(channel) => {
                self.typing_relay.stop(handle.id, &channel);
            }
        }
    }

    fn handle_setup(&self, handle: &ConnectionHandle, payload: &SetupPayload) {
        let identity = match self.authenticator.authenticate(payload) {
            Ok(identity) => identity,
            Err(e) => {
                self.reject_setup(handle, &e);
                return;
            }
        };

        handle.bind_identity(identity.clone());
        self.channels.join(identity.as_str(), handle.id);

        if let Some(previous) = self.registry.register(identity.clone(), handle.id) {
            // Direct messages follow the newest session only.
            self.channels.leave(identity.as_str(), previous);
        }

        debug!(conn_id = %handle.id, user_id = %identity, "Setup complete");
    }

    fn reject_setup(&self, handle: &ConnectionHandle, error: &AppError) {
        let code = match error.kind {
            ErrorKind::Authentication => CODE_UNAUTHORIZED,
            _ => CODE_INVALID_SETUP,
        };
        warn!(conn_id = %handle.id, code, error = %error.message, "Setup rejected");

        handle.send_event(&ServerEvent::error(code, error.message.clone()));
        handle.close();
    }

    /// Closes every open session.
    pub fn close_all(&self) {
        for handle in self.pool.all_connections() {
            handle.close();
        }
    }
}
