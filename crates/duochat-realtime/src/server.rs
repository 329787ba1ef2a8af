//! Top-level real-time engine that ties together all subsystems.

use std::sync::Arc;

use tracing::info;

use duochat_auth::jwt::JwtDecoder;
use duochat_core::config::RealtimeConfig;
use duochat_core::types::UserId;

use crate::channel::registry::ChannelRegistry;
use crate::connection::authenticator::SetupAuthenticator;
use crate::connection::heartbeat::HeartbeatConfig;
use crate::connection::manager::ConnectionManager;
use crate::connection::pool::ConnectionPool;
use crate::connection::registry::ConnectionRegistry;
use crate::metrics::EngineMetrics;
use crate::presence::broadcaster::PresenceBroadcaster;
use crate::relay::{ChannelFanout, MessageRelay, TypingRelay};

/// Central real-time engine that coordinates all WebSocket subsystems.
///
/// Everything is in memory and scoped to this process; a restart starts
/// from an empty presence set.
#[derive(Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Open sessions.
    pub pool: Arc<ConnectionPool>,
    /// Channel registry.
    pub channels: Arc<ChannelRegistry>,
    /// Identity → session registry.
    pub registry: Arc<ConnectionRegistry>,
    /// Presence broadcaster.
    pub presence: Arc<PresenceBroadcaster>,
    /// Message relay.
    pub messages: Arc<MessageRelay>,
    /// Typing relay.
    pub typing: Arc<TypingRelay>,
    /// Metrics collector.
    pub metrics: Arc<EngineMetrics>,
    config: RealtimeConfig,
}

impl std::fmt::Debug for RealtimeEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeEngine").finish()
    }
}

impl RealtimeEngine {
    /// Creates a new real-time engine with all subsystems.
    pub fn new(config: &RealtimeConfig, decoder: Arc<JwtDecoder>) -> Self {
        let metrics = Arc::new(EngineMetrics::new());
        let pool = Arc::new(ConnectionPool::new());
        let channels = Arc::new(ChannelRegistry::new());
        let presence = Arc::new(PresenceBroadcaster::new(pool.clone(), metrics.clone()));
        let registry = Arc::new(ConnectionRegistry::new(presence.clone()));

        let fanout = ChannelFanout::new(pool.clone(), channels.clone(), metrics.clone());
        let messages = Arc::new(MessageRelay::new(fanout.clone()));
        let typing = Arc::new(TypingRelay::new(fanout));

        let authenticator =
            SetupAuthenticator::new(decoder, config.require_authenticated_setup);
        let connections = Arc::new(ConnectionManager::new(
            pool.clone(),
            channels.clone(),
            registry.clone(),
            messages.clone(),
            typing.clone(),
            authenticator,
            metrics.clone(),
            config.outbound_buffer_size,
        ));

        info!(
            authenticated_setup = config.require_authenticated_setup,
            "Real-time engine initialized"
        );

        Self {
            connections,
            pool,
            channels,
            registry,
            presence,
            messages,
            typing,
            metrics,
            config: config.clone(),
        }
    }

    /// Current online identities.
    pub fn online_users(&self) -> Vec<UserId> {
        self.registry.snapshot()
    }

    /// Settings this engine was built with.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }

    /// Idle check settings, `None` when disabled.
    pub fn heartbeat_config(&self) -> Option<HeartbeatConfig> {
        HeartbeatConfig::from_config(&self.config)
    }

    /// Asks every open session to close. Transports finish the teardown.
    pub fn shutdown(&self) {
        info!(
            sessions = self.pool.connection_count(),
            "Shutting down real-time engine"
        );
        self.connections.close_all();
    }
}
