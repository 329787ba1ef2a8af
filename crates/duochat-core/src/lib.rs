//! # duochat-core
//!
//! Core crate for duochat. Contains configuration schemas, typed
//! identifiers, the message record exchanged over the event channel,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other duochat crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
