use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{generate_jwt, hash_password, verify_password};
use crate::config::SecurityConfig;
use crate::database::models::{NewUser, User, UserPatch};
use crate::database::{DatabaseError, IdGenerator, Store, UserStore};

use super::ServiceError;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Token plus the user it was issued for
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub expires_in: u64,
    pub user: User,
}

/// Registration, login and credential management
#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
    ids: Arc<dyn IdGenerator>,
    security: SecurityConfig,
}

impl UserService {
    pub fn new(store: Arc<dyn Store>, ids: Arc<dyn IdGenerator>, security: SecurityConfig) -> Self {
        Self { store, ids, security }
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        validate_username_format(username)?;
        validate_password(password)?;

        if self.store.get_user_by_username(username).await?.is_some() {
            return Err(ServiceError::conflict("Username already exists"));
        }

        let password_hash = hash_password(password, self.security.bcrypt_cost)?;
        let new_user = NewUser {
            user_id: self.ids.new_id(),
            username: username.to_string(),
            password_hash,
        };

        // A concurrent registration can still win the race at the store
        let user = self.store.create_user(new_user).await.map_err(|e| match e {
            DatabaseError::Duplicate(_) => ServiceError::conflict("Username already exists"),
            other => other.into(),
        })?;

        info!("Registered user {} ({})", user.username, user.user_id);
        Ok(user)
    }

    /// Check credentials and issue a token
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ServiceError> {
        let user = match self.store.get_user_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Login failed: unknown user {}", username);
                return Err(ServiceError::InvalidCredentials);
            }
        };

        if !verify_password(password, &user.password_hash)? {
            warn!("Login failed: bad password for {}", username);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = generate_jwt(&self.security, &user.user_id, &user.username)?;
        info!("User {} logged in", user.user_id);

        Ok(Session {
            token,
            expires_in: self.security.jwt_expiry_hours.saturating_mul(3600),
            user,
        })
    }

    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let user = self.require_user(user_id).await?;

        if !verify_password(current_password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }
        validate_password(new_password)?;

        let password_hash = hash_password(new_password, self.security.bcrypt_cost)?;
        self.store
            .update_user(user_id, UserPatch { password_hash: Some(password_hash) })
            .await?;

        info!("User {} changed password", user_id);
        Ok(())
    }

    /// Remove the account after re-checking the password
    pub async fn delete_user(&self, user_id: &str, password: &str) -> Result<(), ServiceError> {
        let user = self.require_user(user_id).await?;

        if !verify_password(password, &user.password_hash)? {
            return Err(ServiceError::InvalidCredentials);
        }

        if !self.store.delete_user(user_id).await? {
            return Err(ServiceError::not_found("User could not be found"));
        }

        info!("Deleted user {}", user_id);
        Ok(())
    }

    async fn require_user(&self, user_id: &str) -> Result<User, ServiceError> {
        self.store
            .get_user_by_user_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User could not be found"))
    }
}

fn validate_username_format(username: &str) -> Result<(), ServiceError> {
    if username.is_empty() {
        return Err(ServiceError::validation("Username cannot be empty"));
    }

    let length = username.chars().count();
    if length < 3 {
        return Err(ServiceError::validation("Username must be at least 3 characters"));
    }

    if length > 50 {
        return Err(ServiceError::validation("Username must be at most 50 characters"));
    }

    // Allow alphanumeric, underscore, hyphen
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ServiceError::validation(
            "Username can only contain letters, numbers, underscore, and hyphen",
        ));
    }

    if !username.chars().next().is_some_and(char::is_alphanumeric) {
        return Err(ServiceError::validation("Username must start with a letter or number"));
    }

    Ok(())
}

fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}
