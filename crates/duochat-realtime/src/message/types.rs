//! Client and server event definitions.
//!
//! Every frame is `{"event": <name>, "data": <payload>}`; events without a
//! payload omit `data`.

use serde::{Deserialize, Serialize};

use duochat_core::types::{MessageRecord, UserId};

/// Events sent by the client to the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Bind this session to a user identity.
    Setup(SetupPayload),
    /// Join the named channel.
    JoinChat(String),
    /// Relay an already-persisted message to its receiver.
    NewMessage(MessageRecord),
    /// Signal typing on a channel.
    Typing(String),
    /// Signal that typing stopped on a channel.
    StopTyping(String),
}

/// User object sent with `setup`.
///
/// Unknown fields (username, bio, ...) of the client's user object are
/// ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupPayload {
    /// Claimed identity.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Credential issued by the REST layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SetupPayload {
    /// Payload carrying only a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Payload carrying only an identity claim.
    pub fn with_id(id: impl Into<UserId>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Events sent by the server to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Full presence snapshot, replacing whatever the client held.
    OnlineUsers(Vec<UserId>),
    /// A message delivered to this session's channel.
    MessageReceived(MessageRecord),
    /// Someone started typing in a channel this session joined.
    Typing,
    /// Someone stopped typing.
    StopTyping,
    /// Setup rejected; the session is closed right after.
    Error(ErrorPayload),
}

impl ServerEvent {
    /// Builds an error event.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error(ErrorPayload {
            code: code.into(),
            message: message.into(),
        })
    }
}

/// Body of an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Machine-readable code.
    pub code: String,
    /// Human-readable description.
    pub message: String,
}
