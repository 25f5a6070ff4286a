use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::database::models::{Comment, Watchlist, WatchlistPatch};
use crate::database::{IdGenerator, LikeStore, Store, UserStore, WatchlistStore};

use super::ServiceError;

const WATCHLIST_NOT_FOUND: &str = "WatchList not found";

/// Identity of the caller as established by the auth layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub user_id: String,
    pub username: String,
}

/// Fields a caller may change on their own watchlist
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWatchlist {
    pub list_name: Option<String>,
    /// Kept untyped so a non-boolean value is reported as a validation failure
    pub is_public: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub list_id: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchlistUpdated {
    pub message: String,
    pub watchlist: Watchlist,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentAdded {
    pub message: String,
    pub comment: Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LikeAction {
    Liked,
    Unliked,
}

impl fmt::Display for LikeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LikeAction::Liked => write!(f, "liked"),
            LikeAction::Unliked => write!(f, "unliked"),
        }
    }
}

/// Watchlist operations with ownership, visibility and uniqueness checks
#[derive(Clone)]
pub struct WatchlistService {
    store: Arc<dyn Store>,
    ids: Arc<dyn IdGenerator>,
}

impl WatchlistService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { store, ids }
    }

    /// Create a private, empty watchlist. Names are not checked for duplicates here.
    pub async fn create_watchlist(&self, owner_user_id: &str, list_name: &str) -> Result<Watchlist, ServiceError> {
        if list_name.trim().is_empty() {
            return Err(ServiceError::validation("List name cannot be empty."));
        }

        let watchlist = self.store.create_watchlist(owner_user_id, list_name).await?;
        info!("Created watchlist {} for user {}", watchlist.list_id, owner_user_id);
        Ok(watchlist)
    }

    /// Owner-only partial update of name and visibility
    pub async fn update_watchlist(
        &self,
        user_id: &str,
        list_id: &str,
        update: UpdateWatchlist,
    ) -> Result<WatchlistUpdated, ServiceError> {
        let watchlist = self.fetch_watchlist(list_id, WATCHLIST_NOT_FOUND).await?;

        if !watchlist.is_owned_by(user_id) {
            return Err(ServiceError::authorization(
                "Unauthorized: You can only update your own watchlists.",
            ));
        }

        let mut patch = WatchlistPatch::default();

        if let Some(list_name) = update.list_name {
            if list_name.trim().is_empty() {
                return Err(ServiceError::validation("List name cannot be empty."));
            }

            let same_name = self
                .store
                .get_watchlists_by_user_id_and_list_name(user_id, &list_name)
                .await?;
            if same_name.iter().any(|other| other.list_id != list_id) {
                return Err(ServiceError::conflict("A watchlist with that name already exists!"));
            }

            patch.list_name = Some(list_name);
        }

        if let Some(is_public) = update.is_public {
            let is_public = is_public
                .as_bool()
                .ok_or_else(|| ServiceError::validation("isPublic must be a boolean."))?;
            patch.is_public = Some(is_public);
        }

        let watchlist = if patch.is_empty() {
            watchlist
        } else {
            self.store.update_watchlist(list_id, patch).await?
        };

        info!("Updated watchlist {} by user {}", list_id, user_id);
        Ok(WatchlistUpdated {
            message: "Watchlist updated successfully".to_string(),
            watchlist,
        })
    }

    /// Toggle `user_id`'s like on `list_id`.
    ///
    /// The decision is read from `watchlist.likes`; both the watchlist and the
    /// user's `liked_lists` are then written in one store operation.
    pub async fn like_watchlist(&self, user_id: &str, list_id: &str) -> Result<LikeAction, ServiceError> {
        let user = self
            .store
            .get_user_by_user_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User could not be found"))?;

        let watchlist = self.fetch_watchlist(list_id, "Watchlist could not be found").await?;

        let action = if watchlist.is_liked_by(&user.user_id) {
            LikeAction::Unliked
        } else {
            LikeAction::Liked
        };

        self.store
            .set_liked(&user.user_id, &watchlist.list_id, action == LikeAction::Liked)
            .await?;

        info!("User {} {} watchlist {}", user_id, action, list_id);
        Ok(action)
    }

    /// Append a comment to a watchlist the requester can see
    pub async fn comment_on_watchlist(
        &self,
        requester: &Requester,
        new_comment: NewComment,
    ) -> Result<CommentAdded, ServiceError> {
        if new_comment.comment.trim().is_empty() {
            return Err(ServiceError::validation("Comment cannot be empty."));
        }

        let watchlist = self.fetch_watchlist(&new_comment.list_id, WATCHLIST_NOT_FOUND).await?;

        if !watchlist.is_visible_to(&requester.user_id) {
            return Err(ServiceError::authorization(
                "Unauthorized: You cannot comment on this watchlist.",
            ));
        }

        let comment = Comment {
            comment_id: self.ids.new_id(),
            user_id: requester.user_id.clone(),
            username: requester.username.clone(),
            comment: new_comment.comment,
            date_posted: Utc::now(),
        };

        let mut comments = watchlist.comments;
        comments.push(comment.clone());

        let patch = WatchlistPatch { comments: Some(comments), ..Default::default() };
        self.store.update_watchlist(&watchlist.list_id, patch).await?;

        info!(
            "User {} commented {} on watchlist {}",
            requester.user_id, comment.comment_id, watchlist.list_id
        );
        Ok(CommentAdded {
            message: "Comment added successfully".to_string(),
            comment,
        })
    }

    /// Remove one comment by id. Any authenticated caller may do this.
    // TODO: restrict to the comment author or list owner once clients can handle a 403 here
    pub async fn delete_comment_on_watchlist(
        &self,
        list_id: &str,
        comment_id: &str,
    ) -> Result<WatchlistUpdated, ServiceError> {
        let watchlist = self.fetch_watchlist(list_id, WATCHLIST_NOT_FOUND).await?;

        let position = watchlist
            .comments
            .iter()
            .position(|c| c.comment_id == comment_id)
            .ok_or_else(|| ServiceError::not_found("Comment not found"))?;

        let mut comments = watchlist.comments;
        comments.remove(position);

        let patch = WatchlistPatch { comments: Some(comments), ..Default::default() };
        let watchlist = self.store.update_watchlist(list_id, patch).await?;

        info!("Deleted comment {} from watchlist {}", comment_id, list_id);
        Ok(WatchlistUpdated {
            message: "Comment deleted successfully".to_string(),
            watchlist,
        })
    }

    /// `Ok(None)` means the list exists but `user_id` may not see it
    pub async fn get_watchlist(&self, user_id: &str, list_id: &str) -> Result<Option<Watchlist>, ServiceError> {
        let watchlist = self.fetch_watchlist(list_id, WATCHLIST_NOT_FOUND).await?;

        if watchlist.is_visible_to(user_id) {
            Ok(Some(watchlist))
        } else {
            debug!("User {} denied read of watchlist {}", user_id, list_id);
            Ok(None)
        }
    }

    async fn fetch_watchlist(&self, list_id: &str, missing: &str) -> Result<Watchlist, ServiceError> {
        self.store
            .get_watchlist_by_list_id(list_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(missing))
    }
}
