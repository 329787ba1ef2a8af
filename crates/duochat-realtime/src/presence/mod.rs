//! Presence broadcast.

pub mod broadcaster;

pub use broadcaster::PresenceBroadcaster;
