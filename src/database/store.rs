use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserPatch, Watchlist, WatchlistPatch};

/// Persistence for watchlist records
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    async fn get_watchlist_by_list_id(&self, list_id: &str) -> Result<Option<Watchlist>, DatabaseError>;

    /// Every watchlist owned by `user_id` whose name is exactly `list_name`
    async fn get_watchlists_by_user_id_and_list_name(
        &self,
        user_id: &str,
        list_name: &str,
    ) -> Result<Vec<Watchlist>, DatabaseError>;

    /// Applies the given fields and returns the stored record afterwards.
    /// Fails with `DatabaseError::NotFound` when no such list exists.
    async fn update_watchlist(&self, list_id: &str, patch: WatchlistPatch) -> Result<Watchlist, DatabaseError>;

    async fn create_watchlist(&self, owner_user_id: &str, list_name: &str) -> Result<Watchlist, DatabaseError>;
}

/// Persistence for user records
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<User, DatabaseError>;

    /// Returns false when there was nothing to delete
    async fn delete_user(&self, user_id: &str) -> Result<bool, DatabaseError>;
}

/// Writes the like relation on both sides in a single store operation.
#[async_trait]
pub trait LikeStore: Send + Sync {
    /// Sets whether `user_id` likes `list_id`: `watchlist.likes` and
    /// `user.liked_lists` end up agreeing, or neither is changed.
    async fn set_liked(&self, user_id: &str, list_id: &str, liked: bool) -> Result<(), DatabaseError>;
}

/// Everything the services need from a backend
pub trait Store: WatchlistStore + UserStore + LikeStore {}

impl<T> Store for T where T: WatchlistStore + UserStore + LikeStore {}

/// Source of unique identifiers for comments and users
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
