use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registered user. `liked_lists` mirrors membership in each watchlist's `likes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub liked_lists: BTreeSet<String>,
}

/// Input for creating a user; the store assigns nothing beyond what is given here.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
}

/// Partial update of a user record. `None` leaves the field untouched.
/// `liked_lists` is only written through `LikeStore::set_liked`.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub password_hash: Option<String>,
}

impl UserPatch {
    pub fn apply(self, user: &mut User) {
        if let Some(password_hash) = self.password_hash {
            user.password_hash = password_hash;
        }
    }
}

/// Row shape of the `users` table
#[derive(Debug, FromRow)]
pub struct UserRow {
    pub user_id: String,
    pub username: String,
    pub password_hash: String,
    pub liked_lists: Vec<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            liked_lists: row.liked_lists.into_iter().collect(),
        }
    }
}

impl From<NewUser> for User {
    fn from(new_user: NewUser) -> Self {
        Self {
            user_id: new_user.user_id,
            username: new_user.username,
            password_hash: new_user.password_hash,
            liked_lists: BTreeSet::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User::from(NewUser {
            user_id: "user123".into(),
            username: "alice".into(),
            password_hash: "$2b$04$secret".into(),
        });
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("passwordHash").is_none());
        assert_eq!(value["userId"], "user123");
        assert_eq!(value["likedLists"], serde_json::json!([]));
    }

    #[test]
    fn patch_only_touches_given_fields() {
        let mut user = User::from(NewUser {
            user_id: "user123".into(),
            username: "alice".into(),
            password_hash: "old".into(),
        });
        UserPatch { password_hash: Some("new".into()) }.apply(&mut user);
        assert_eq!(user.password_hash, "new");
        assert_eq!(user.username, "alice");
    }
}
