//! # duochat-realtime
//!
//! Real-time layer for duochat. Provides:
//!
//! - Live session pool and the identity → session connection registry
//! - Full-snapshot presence broadcast on every registry mutation
//! - Channel membership (channels are named by user identity)
//! - Best-effort relay of already-persisted messages to the receiver's channel
//! - Ephemeral typing / stop-typing relay
//! - Authenticated `setup` and idle-session heartbeat

pub mod channel;
pub mod connection;
pub mod message;
pub mod metrics;
pub mod presence;
pub mod relay;
pub mod server;

pub use channel::registry::ChannelRegistry;
pub use connection::manager::ConnectionManager;
pub use connection::registry::ConnectionRegistry;
pub use message::types::{ClientEvent, ServerEvent, SetupPayload};
pub use presence::broadcaster::PresenceBroadcaster;
pub use relay::message::{MessageRelay, RelayOutcome};
pub use relay::typing::TypingRelay;
pub use server::RealtimeEngine;
