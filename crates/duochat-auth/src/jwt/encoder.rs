//! JWT token creation.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use duochat_core::config::AuthConfig;
use duochat_core::error::AppError;
use duochat_core::types::UserId;

use super::claims::Claims;

/// Creates signed HS256 tokens for a user identity.
#[derive(Clone)]
pub struct JwtEncoder {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// Token TTL in days, as configured.
    ttl_days: u64,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("ttl_days", &self.ttl_days)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_days: config.token_ttl_days,
        }
    }

    /// Issues a token for `user_id` valid for the configured TTL.
    ///
    /// Fails with a configuration error when the TTL does not fit in a
    /// timestamp.
    pub fn issue(&self, user_id: &UserId) -> Result<String, AppError> {
        let now = Utc::now();
        let expires = i64::try_from(self.ttl_days)
            .ok()
            .and_then(TimeDelta::try_days)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::configuration(format!(
                    "auth.token_ttl_days out of range: {}",
                    self.ttl_days
                ))
            })?;
        let claims = Claims {
            id: user_id.clone(),
            iat: now.timestamp(),
            exp: expires.timestamp(),
        };
        self.encode(&claims)
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }
}
