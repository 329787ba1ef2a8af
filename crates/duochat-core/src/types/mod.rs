//! Shared domain types.

pub mod id;
pub mod message;

pub use id::{ConnectionId, UserId};
pub use message::MessageRecord;
