//! # duochat-client
//!
//! Client side of the duochat event channel: a WebSocket [`ChatClient`]
//! and the [`TypingDebouncer`] that turns keystrokes into `typing` /
//! `stop-typing` signals.

pub mod client;
pub mod error;
pub mod typing;

pub use client::{ChatClient, EventSender};
pub use error::ClientError;
pub use typing::{TypingDebouncer, TypingEmitter, DEFAULT_QUIET_INTERVAL};
