//! User repository implementation.

use sqlx::{Executor, PgPool, Postgres};

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{FolderId, UserId};
use drivebox_entity::user::User;

/// Repository for user lookups and root-folder bookkeeping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    /// Load a user and hold a row lock on it until the surrounding
    /// transaction ends. Serialises usage accounting per user.
    pub async fn lock_for_update<'e, E>(&self, id: UserId, executor: E) -> AppResult<Option<User>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock user", e))
    }

    /// Record the user's root folder if none is set yet.
    ///
    /// Returns `false` when another request set it first.
    pub async fn set_root_folder<'e, E>(
        &self,
        id: UserId,
        folder_id: FolderId,
        executor: E,
    ) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE users SET root_folder_id = $2 WHERE id = $1 AND root_folder_id IS NULL",
        )
        .bind(id)
        .bind(folder_id)
        .execute(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to set root folder", e))?;
        Ok(result.rows_affected() > 0)
    }
}
