use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::manager::{map_unique_violation, DatabaseError, PgStore};
use crate::database::models::{
    NewUser, User, UserPatch, UserRow, Watchlist, WatchlistPatch, WatchlistRow,
};
use crate::database::store::{LikeStore, UserStore, WatchlistStore};

const WATCHLIST_COLUMNS: &str =
    "list_id, owner_user_id, list_name, is_public, collaborators, likes, comments";
const USER_COLUMNS: &str = "user_id, username, password_hash, liked_lists";

#[async_trait]
impl WatchlistStore for PgStore {
    async fn get_watchlist_by_list_id(&self, list_id: &str) -> Result<Option<Watchlist>, DatabaseError> {
        let sql = format!("SELECT {} FROM watchlists WHERE list_id = $1", WATCHLIST_COLUMNS);
        let row = sqlx::query_as::<_, WatchlistRow>(&sql)
            .bind(list_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Watchlist::from))
    }

    async fn get_watchlists_by_user_id_and_list_name(
        &self,
        user_id: &str,
        list_name: &str,
    ) -> Result<Vec<Watchlist>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM watchlists WHERE owner_user_id = $1 AND list_name = $2",
            WATCHLIST_COLUMNS
        );
        let rows = sqlx::query_as::<_, WatchlistRow>(&sql)
            .bind(user_id)
            .bind(list_name)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Watchlist::from).collect())
    }

    async fn update_watchlist(&self, list_id: &str, patch: WatchlistPatch) -> Result<Watchlist, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE watchlists SET
                list_name = COALESCE($2, list_name),
                is_public = COALESCE($3, is_public),
                comments  = COALESCE($4, comments)
            WHERE list_id = $1
            RETURNING {}
            "#,
            WATCHLIST_COLUMNS
        );
        let row = sqlx::query_as::<_, WatchlistRow>(&sql)
            .bind(list_id)
            .bind(patch.list_name)
            .bind(patch.is_public)
            .bind(patch.comments.map(Json))
            .fetch_optional(&self.pool)
            .await?;

        row.map(Watchlist::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("watchlist {}", list_id)))
    }

    async fn create_watchlist(&self, owner_user_id: &str, list_name: &str) -> Result<Watchlist, DatabaseError> {
        let sql = format!(
            "INSERT INTO watchlists (list_id, owner_user_id, list_name) VALUES ($1, $2, $3) RETURNING {}",
            WATCHLIST_COLUMNS
        );
        let row = sqlx::query_as::<_, WatchlistRow>(&sql)
            .bind(Uuid::new_v4().to_string())
            .bind(owner_user_id)
            .bind(list_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn get_user_by_user_id(&self, user_id: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE user_id = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let sql = format!(
            "INSERT INTO users (user_id, username, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.user_id)
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, format!("username {}", new_user.username)))?;
        Ok(row.into())
    }

    async fn update_user(&self, user_id: &str, patch: UserPatch) -> Result<User, DatabaseError> {
        let sql = format!(
            r#"
            UPDATE users SET
                password_hash = COALESCE($2, password_hash)
            WHERE user_id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id)
            .bind(patch.password_hash)
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::from)
            .ok_or_else(|| DatabaseError::NotFound(format!("user {}", user_id)))
    }

    async fn delete_user(&self, user_id: &str) -> Result<bool, DatabaseError> {
        let mut tx = self.pool.begin().await?;

        // Drop the user's likes with the user so no list counts a missing liker
        sqlx::query("UPDATE watchlists SET likes = array_remove(likes, $1) WHERE $1 = ANY(likes)")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl LikeStore for PgStore {
    async fn set_liked(&self, user_id: &str, list_id: &str, liked: bool) -> Result<(), DatabaseError> {
        // array_remove first so a like never duplicates an existing entry
        let (list_sql, user_sql) = if liked {
            (
                "UPDATE watchlists SET likes = array_append(array_remove(likes, $1), $1) WHERE list_id = $2",
                "UPDATE users SET liked_lists = array_append(array_remove(liked_lists, $2), $2) WHERE user_id = $1",
            )
        } else {
            (
                "UPDATE watchlists SET likes = array_remove(likes, $1) WHERE list_id = $2",
                "UPDATE users SET liked_lists = array_remove(liked_lists, $2) WHERE user_id = $1",
            )
        };

        let mut tx = self.pool.begin().await?;

        let listed = sqlx::query(list_sql)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;
        if listed.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("watchlist {}", list_id)));
        }

        let mirrored = sqlx::query(user_sql)
            .bind(user_id)
            .bind(list_id)
            .execute(&mut *tx)
            .await?;
        if mirrored.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(format!("user {}", user_id)));
        }

        tx.commit().await?;
        Ok(())
    }
}
