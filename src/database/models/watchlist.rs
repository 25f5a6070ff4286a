use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Comment embedded in a watchlist, kept in posting order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub comment_id: String,
    pub user_id: String,
    pub username: String,
    pub comment: String,
    pub date_posted: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watchlist {
    pub list_id: String,
    pub owner_user_id: String,
    pub list_name: String,
    pub is_public: bool,
    pub collaborators: BTreeSet<String>,
    pub likes: BTreeSet<String>,
    pub comments: Vec<Comment>,
}

impl Watchlist {
    /// Fresh private list with no collaborators, likes or comments
    pub fn new(list_id: impl Into<String>, owner_user_id: impl Into<String>, list_name: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            owner_user_id: owner_user_id.into(),
            list_name: list_name.into(),
            is_public: false,
            collaborators: BTreeSet::new(),
            likes: BTreeSet::new(),
            comments: Vec::new(),
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_user_id == user_id
    }

    /// Public lists are visible to everyone; private ones to the owner and collaborators.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        self.is_public || self.is_owned_by(user_id) || self.collaborators.contains(user_id)
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.contains(user_id)
    }
}

/// Partial update of a watchlist record. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct WatchlistPatch {
    pub list_name: Option<String>,
    pub is_public: Option<bool>,
    pub comments: Option<Vec<Comment>>,
}

impl WatchlistPatch {
    pub fn is_empty(&self) -> bool {
        self.list_name.is_none() && self.is_public.is_none() && self.comments.is_none()
    }

    pub fn apply(self, watchlist: &mut Watchlist) {
        if let Some(list_name) = self.list_name {
            watchlist.list_name = list_name;
        }
        if let Some(is_public) = self.is_public {
            watchlist.is_public = is_public;
        }
        if let Some(comments) = self.comments {
            watchlist.comments = comments;
        }
    }
}

/// Row shape of the `watchlists` table
#[derive(Debug, FromRow)]
pub struct WatchlistRow {
    pub list_id: String,
    pub owner_user_id: String,
    pub list_name: String,
    pub is_public: bool,
    pub collaborators: Vec<String>,
    pub likes: Vec<String>,
    pub comments: Json<Vec<Comment>>,
}

impl From<WatchlistRow> for Watchlist {
    fn from(row: WatchlistRow) -> Self {
        Self {
            list_id: row.list_id,
            owner_user_id: row.owner_user_id,
            list_name: row.list_name,
            is_public: row.is_public,
            collaborators: row.collaborators.into_iter().collect(),
            likes: row.likes.into_iter().collect(),
            comments: row.comments.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visibility_rules() {
        let mut list = Watchlist::new("list123", "owner", "Movies");
        assert!(list.is_visible_to("owner"));
        assert!(!list.is_visible_to("stranger"));

        list.collaborators.insert("friend".into());
        assert!(list.is_visible_to("friend"));
        assert!(!list.is_visible_to("stranger"));

        list.is_public = true;
        assert!(list.is_visible_to("stranger"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let list = Watchlist::new("list123", "user123", "Movies");
        let value = serde_json::to_value(&list).unwrap();
        assert_eq!(value["listId"], "list123");
        assert_eq!(value["ownerUserId"], "user123");
        assert_eq!(value["isPublic"], false);
        assert_eq!(value["comments"], serde_json::json!([]));
    }

    #[test]
    fn patch_applies_only_given_fields() {
        let mut list = Watchlist::new("list123", "user123", "Movies");
        let patch = WatchlistPatch { is_public: Some(true), ..Default::default() };
        assert!(!patch.is_empty());
        patch.apply(&mut list);
        assert!(list.is_public);
        assert_eq!(list.list_name, "Movies");
    }
}
