// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::State;

use crate::middleware::{ApiJson, ApiResponse, ApiResult};
use crate::services::Session;
use crate::state::AppState;

use super::Credentials;

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Expected Output (Success):
/// ```json
/// {
///   "success": true,
///   "data": {
///     "token": "eyJhbGciOiJIUzI1NiI...",
///     "expiresIn": 604800,
///     "user": { "userId": "...", "username": "alice", "likedLists": [] }
///   }
/// }
/// ```
pub async fn login_post(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<Credentials>,
) -> ApiResult<Session> {
    let session = state.users().login(&body.username, &body.password).await?;
    Ok(ApiResponse::success(session))
}
