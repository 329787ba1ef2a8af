//! Frame encoding helpers.

use tracing::error;

use super::types::ServerEvent;

/// Serializes a server event into a text frame.
///
/// Returns `None` (and logs) if serialization fails; callers treat that as
/// a dropped delivery.
pub fn encode(event: &ServerEvent) -> Option<String> {
    match serde_json::to_string(event) {
        Ok(frame) => Some(frame),
        Err(e) => {
            error!(error = %e, "Failed to serialize outbound event");
            None
        }
    }
}
