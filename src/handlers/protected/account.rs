use axum::{extract::State, Extension};
use serde::{Deserialize, Serialize};

use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePassword {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmPassword {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

/// PUT /users/me/password
pub async fn password_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<ChangePassword>,
) -> ApiResult<Message> {
    state
        .users()
        .change_password(&auth.user_id, &body.current_password, &body.new_password)
        .await?;
    Ok(ApiResponse::success(Message { message: "Password changed successfully" }))
}

/// DELETE /users/me - requires the password again
pub async fn account_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<ConfirmPassword>,
) -> ApiResult<Message> {
    state.users().delete_user(&auth.user_id, &body.password).await?;
    Ok(ApiResponse::success(Message { message: "User deleted successfully" }))
}
