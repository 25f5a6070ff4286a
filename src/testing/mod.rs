use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::{AppConfig, Environment};
use crate::database::models::{NewUser, User, Watchlist};
use crate::database::{IdGenerator, MemoryStore, UserStore};
use crate::services::{Requester, UserService, WatchlistService};

/// Deterministic ids: `comment-1`, `comment-2`, ...
#[derive(Debug)]
pub struct SequentialIds {
    prefix: &'static str,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: &'static str) -> Self {
        Self { prefix, next: AtomicU64::new(1) }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        format!("{}-{}", self.prefix, self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Services wired to a fresh in-memory store
pub struct TestContext {
    pub store: MemoryStore,
    pub config: AppConfig,
    pub watchlists: WatchlistService,
    pub users: UserService,
}

impl TestContext {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let config = AppConfig::preset(Environment::Development);
        let shared = Arc::new(store.clone());

        Self {
            watchlists: WatchlistService::new(shared.clone(), Arc::new(SequentialIds::new("comment"))),
            users: UserService::new(shared, Arc::new(SequentialIds::new("user")), config.security.clone()),
            store,
            config,
        }
    }

    /// Insert a user directly, bypassing validation and hashing
    pub async fn seed_user(&self, user_id: &str, username: &str) -> User {
        self.store
            .create_user(NewUser {
                user_id: user_id.to_string(),
                username: username.to_string(),
                password_hash: String::new(),
            })
            .await
            .expect("seed user")
    }

    /// Insert a private, empty watchlist with a fixed id
    pub async fn seed_watchlist(&self, list_id: &str, owner: &str, name: &str) -> Watchlist {
        let watchlist = Watchlist::new(list_id, owner, name);
        self.store.insert_watchlist(watchlist.clone()).await;
        watchlist
    }

    pub fn requester(user_id: &str, username: &str) -> Requester {
        Requester { user_id: user_id.to_string(), username: username.to_string() }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
