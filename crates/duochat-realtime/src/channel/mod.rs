//! Named delivery groups.
//!
//! A channel is a plain name; by convention each user's own identity is a
//! channel their sessions join, which is how direct messages reach them.

pub mod channel;
pub mod membership;
pub mod registry;

pub use registry::ChannelRegistry;
