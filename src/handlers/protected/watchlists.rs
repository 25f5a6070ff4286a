use axum::{
    extract::{Path, State},
    Extension,
};
use serde::{Deserialize, Serialize};

use crate::database::models::Watchlist;
use crate::error::ApiError;
use crate::middleware::{ApiJson, ApiResponse, ApiResult, AuthUser};
use crate::services::{CommentAdded, LikeAction, NewComment, UpdateWatchlist, WatchlistUpdated};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWatchlist {
    #[serde(default)]
    pub list_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct LikeResult {
    pub message: String,
    pub action: LikeAction,
}

/// POST /watchlists
pub async fn watchlist_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    ApiJson(body): ApiJson<CreateWatchlist>,
) -> ApiResult<Watchlist> {
    let watchlist = state.watchlists().create_watchlist(&auth.user_id, &body.list_name).await?;
    Ok(ApiResponse::created(watchlist))
}

/// GET /watchlists/:list_id - 404 when missing, 403 when not visible to the caller
pub async fn watchlist_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<String>,
) -> ApiResult<Watchlist> {
    match state.watchlists().get_watchlist(&auth.user_id, &list_id).await? {
        Some(watchlist) => Ok(ApiResponse::success(watchlist)),
        None => {
            tracing::warn!("User {} may not read watchlist {}", auth.user_id, list_id);
            Err(ApiError::forbidden("You do not have access to this watchlist."))
        }
    }
}

/// PUT /watchlists/:list_id - owner-only rename / visibility change
pub async fn watchlist_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<String>,
    ApiJson(body): ApiJson<UpdateWatchlist>,
) -> ApiResult<WatchlistUpdated> {
    let updated = state.watchlists().update_watchlist(&auth.user_id, &list_id, body).await?;
    Ok(ApiResponse::success(updated))
}

/// PATCH /watchlists/:list_id/likes - toggle
pub async fn likes_patch(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<String>,
) -> ApiResult<LikeResult> {
    let action = state.watchlists().like_watchlist(&auth.user_id, &list_id).await?;
    Ok(ApiResponse::success(LikeResult {
        message: format!("List has been successfully {}", action),
        action,
    }))
}

/// PUT /watchlists/:list_id/comments
pub async fn comments_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(list_id): Path<String>,
    ApiJson(body): ApiJson<CommentBody>,
) -> ApiResult<CommentAdded> {
    let new_comment = NewComment { list_id, comment: body.comment };
    let added = state
        .watchlists()
        .comment_on_watchlist(&auth.requester(), new_comment)
        .await?;
    Ok(ApiResponse::created(added))
}

/// DELETE /watchlists/:list_id/comments/:comment_id
pub async fn comment_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((list_id, comment_id)): Path<(String, String)>,
) -> ApiResult<WatchlistUpdated> {
    tracing::debug!("User {} deleting comment {} on {}", auth.user_id, comment_id, list_id);
    let updated = state
        .watchlists()
        .delete_comment_on_watchlist(&list_id, &comment_id)
        .await?;
    Ok(ApiResponse::success(updated))
}
