use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserPatch, Watchlist, WatchlistPatch};
use crate::database::store::{LikeStore, UserStore, WatchlistStore};

#[derive(Default)]
struct Tables {
    users: HashMap<String, User>,
    watchlists: HashMap<String, Watchlist>,
}

/// In-process store. Both tables sit behind one lock so multi-table writes are atomic.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed watchlist, replacing any list with the same id
    pub async fn insert_watchlist(&self, watchlist: Watchlist) {
        let mut tables = self.tables.write().await;
        tables.watchlists.insert(watchlist.list_id.clone(), watchlist);
    }
}

#[async_trait]
impl WatchlistStore for MemoryStore {
    async fn get_watchlist_by_list_id(&self, list_id: &str) -> Result<Option<Watchlist>, DatabaseError> {
        Ok(self.tables.read().await.watchlists.get(list_id).cloned())
    }

    async fn get_watchlists_by_user_id_and_list_name(
        &self,
        user_id: &str,
        list_name: &str,
    ) -> Result<Vec<Watchlist>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .watchlists
            .values()
            .filter(|w| w.owner_user_id == user_id && w.list_name == list_name)
            .cloned()
            .collect())
    }

    async fn update_watchlist(&self, list_id: &str, patch: WatchlistPatch) -> Result<Watchlist, DatabaseError> {
        let mut tables = self.tables.write().await;
        let watchlist = tables
            .watchlists
            .get_mut(list_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("watchlist {}", list_id)))?;
        patch.apply(watchlist);
        Ok(watchlist.clone())
    }

    async fn create_watchlist(&self, owner_user_id: &str, list_name: &str) -> Result<Watchlist, DatabaseError> {
        let watchlist = Watchlist::new(Uuid::new_v4().to_string(), owner_user_id, list_name);
        let mut tables = self.tables.write().await;
        tables.watchlists.insert(watchlist.list_id.clone(), watchlist.clone());
        Ok(watchlist)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError> {
        Ok(self.tables.read().await.users.get(user_id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Duplicate(format!("username {}", new_user.username)));
        }
        if tables.users.contains_key(&new_user.user_id) {
            return Err(DatabaseError::Duplicate(format!("user {}", new_user.user_id)));
        }
        let user = User::from(new_user);
        tables.users.insert(user.user_id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;
        patch.apply(user);
        Ok(user.clone())
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(user_id).is_none() {
            return Ok(false);
        }
        // Likes go with the user, including any the mirror missed
        for watchlist in tables.watchlists.values_mut() {
            watchlist.likes.remove(user_id);
        }
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for MemoryStore {
    async fn set_liked(&self, user_id: &str, list_id: &str, liked: bool) -> Result<(), DatabaseError> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;

        // Check both sides before touching either
        let watchlist = tables
            .watchlists
            .get_mut(list_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("watchlist {}", list_id)))?;
        let user = tables
            .users
            .get_mut(user_id)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))?;

        if liked {
            watchlist.likes.insert(user_id.to_string());
            user.liked_lists.insert(list_id.to_string());
        } else {
            watchlist.likes.remove(user_id);
            user.liked_lists.remove(list_id);
        }
        Ok(())
    }
}
