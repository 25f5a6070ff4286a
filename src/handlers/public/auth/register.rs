// handlers/public/auth/register.rs - POST /users handler

use axum::extract::State;

use crate::database::models::User;
use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::state::AppState;

use super::Credentials;

/// POST /users - Register new user account
///
/// Expected Input:
/// ```json
/// { "username": "alice", "password": "at least 8 chars" }
/// ```
pub async fn register_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<User> {
    let user = state.users().create_user(&body.username, &body.password).await?;
    Ok(ApiResponse::created(user))
}
