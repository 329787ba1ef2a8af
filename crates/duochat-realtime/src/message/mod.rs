//! Event channel wire format.

pub mod serializer;
pub mod types;

pub use types::{ClientEvent, ErrorPayload, ServerEvent, SetupPayload};
