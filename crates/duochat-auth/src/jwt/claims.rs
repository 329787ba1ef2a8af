//! JWT claims structure shared with the REST layer.

use serde::{Deserialize, Serialize};

use duochat_core::types::UserId;

/// Claims payload: `{ "id": <user id>, "iat": .., "exp": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the user the token was issued to.
    pub id: UserId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Returns the user identity.
    pub fn user_id(&self) -> &UserId {
        &self.id
    }
}
