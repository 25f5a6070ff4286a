pub mod user_service;
pub mod watchlist_service;

use thiserror::Error;

use crate::auth::AuthError;
use crate::database::DatabaseError;

pub use user_service::{Session, UserService};
pub use watchlist_service::{
    CommentAdded, LikeAction, NewComment, Requester, UpdateWatchlist, WatchlistService, WatchlistUpdated,
};

/// Failures surfaced by the services. The first failure encountered is returned.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Authorization(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        ServiceError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ServiceError::NotFound(message.into())
    }

    pub fn authorization(message: impl Into<String>) -> Self {
        ServiceError::Authorization(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ServiceError::Conflict(message.into())
    }
}
