//! Setup authentication: resolves the identity a session may bind.

use std::sync::Arc;

use duochat_auth::jwt::JwtDecoder;
use duochat_core::error::AppError;
use duochat_core::types::UserId;

use crate::message::types::SetupPayload;

/// Validates `setup` payloads.
///
/// With `require_token` set, the identity comes from the token claims and a
/// claimed `_id` must agree with them. Otherwise the claimed `_id` is
/// trusted as-is.
#[derive(Clone)]
pub struct SetupAuthenticator {
    decoder: Arc<JwtDecoder>,
    require_token: bool,
}

impl std::fmt::Debug for SetupAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetupAuthenticator")
            .field("require_token", &self.require_token)
            .finish()
    }
}

impl SetupAuthenticator {
    /// Creates a new setup authenticator.
    pub fn new(decoder: Arc<JwtDecoder>, require_token: bool) -> Self {
        Self {
            decoder,
            require_token,
        }
    }

    /// Resolves the identity to bind for this payload.
    pub fn authenticate(&self, payload: &SetupPayload) -> Result<UserId, AppError> {
        if !self.require_token {
            return payload
                .id
                .clone()
                .ok_or_else(|| AppError::validation("Setup payload is missing _id"));
        }

        let token = payload
            .token
            .as_deref()
            .ok_or_else(|| AppError::authentication("Setup requires a token"))?;
        let claims = self.decoder.decode(token)?;

        match &payload.id {
            Some(claimed) if *claimed != claims.id => Err(AppError::authentication(
                "Token does not match the claimed identity",
            )),
            _ => Ok(claims.id),
        }
    }
}
