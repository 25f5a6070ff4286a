//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{IdGenerator, PgStore, Store};
use crate::services::{UserService, WatchlistService};

/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    watchlists: WatchlistService,
    users: UserService,
    database: Option<PgStore>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn Store>, ids: Arc<dyn IdGenerator>) -> Self {
        Self::build(config, store, ids, None)
    }

    /// State backed by PostgreSQL; `/health` pings the pool
    pub fn with_database(config: AppConfig, database: PgStore, ids: Arc<dyn IdGenerator>) -> Self {
        let store: Arc<dyn Store> = Arc::new(database.clone());
        Self::build(config, store, ids, Some(database))
    }

    fn build(
        config: AppConfig,
        store: Arc<dyn Store>,
        ids: Arc<dyn IdGenerator>,
        database: Option<PgStore>,
    ) -> Self {
        let watchlists = WatchlistService::new(store.clone(), ids.clone());
        let users = UserService::new(store, ids, config.security.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                watchlists,
                users,
                database,
            }),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn watchlists(&self) -> &WatchlistService {
        &self.inner.watchlists
    }

    pub fn users(&self) -> &UserService {
        &self.inner.users
    }

    pub fn database(&self) -> Option<&PgStore> {
        self.inner.database.as_ref()
    }
}
