//! User operations

use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, User, UserChanges};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user
    ///
    /// Fails with [`DbError::Duplicate`] when the username is taken.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, is_admin, is_handler)
            VALUES (?, ?, ?, ?)
            RETURNING uid
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.is_handler)
        .fetch_one(&self.pool)
        .await?;

        let uid: i64 = result.get("uid");

        Ok(User {
            uid,
            username: user.username,
            password_hash: user.password_hash,
            is_admin: user.is_admin,
            is_handler: user.is_handler,
        })
    }

    /// Get a user by exact username match
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT uid, username, password_hash, is_admin, is_handler
            FROM users
            WHERE username = ?
            LIMIT 1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, uid: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT uid, username, password_hash, is_admin, is_handler
            FROM users
            WHERE uid = ?
            "#,
        )
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT uid, username, password_hash, is_admin, is_handler
            FROM users
            ORDER BY uid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Apply a partial update in a single statement
    ///
    /// Either every requested change is stored or none is; a taken
    /// username fails the whole update with [`DbError::Duplicate`].
    pub async fn update_user(&self, uid: i64, changes: UserChanges) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                password_hash = COALESCE(?, password_hash),
                is_admin = COALESCE(?, is_admin),
                is_handler = COALESCE(?, is_handler)
            WHERE uid = ?
            "#,
        )
        .bind(changes.username)
        .bind(changes.password_hash)
        .bind(changes.is_admin)
        .bind(changes.is_handler)
        .bind(uid)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user
    ///
    /// Fails with [`DbError::Constraint`] while transactions still name
    /// the user as a handler.
    pub async fn delete_user(&self, uid: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE uid = ?")
            .bind(uid)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}
