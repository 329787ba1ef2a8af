//! # duochat-api
//!
//! HTTP layer for duochat built on Axum.
//!
//! Serves the event channel's WebSocket upgrade plus small health and
//! presence endpoints, with CORS, tracing and request logging.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
