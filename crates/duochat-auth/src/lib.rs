//! # duochat-auth
//!
//! Encoding and validation of the JWT credential issued by the REST layer
//! and presented again on the event channel's `setup` event.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
