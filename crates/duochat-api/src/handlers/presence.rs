//! Presence lookups over HTTP.

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use duochat_core::error::AppError;
use duochat_core::types::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Body of `GET /api/presence`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresenceResponse {
    pub online_users: Vec<UserId>,
}

/// Body of `GET /api/presence/{user_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPresenceResponse {
    pub user_id: UserId,
    pub online: bool,
}

/// GET /api/presence
pub async fn online_users(State(state): State<AppState>) -> Json<PresenceResponse> {
    Json(PresenceResponse {
        online_users: state.realtime.online_users(),
    })
}

/// GET /api/presence/{user_id}
pub async fn user_presence(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserPresenceResponse>, ApiError> {
    let user_id = UserId::new(user_id);
    if state.realtime.registry.lookup(&user_id).is_none() {
        return Err(AppError::not_found(format!("User {user_id} is not online")).into());
    }

    Ok(Json(UserPresenceResponse {
        user_id,
        online: true,
    }))
}
