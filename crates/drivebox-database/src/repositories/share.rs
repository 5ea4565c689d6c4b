//! Shared item repository implementation.

use sqlx::PgPool;
use uuid::Uuid;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{ShareId, UserId};
use drivebox_entity::share::{CreateSharedItem, SharedItem};

/// Repository for share CRUD and token lookup operations.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: PgPool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a share.
    pub async fn create(&self, data: &CreateSharedItem) -> AppResult<SharedItem> {
        sqlx::query_as::<_, SharedItem>(
            "INSERT INTO shared_items (id, user_id, shareable_type, file_id, folder_id, \
             shared_url, shared_with, message, password_hash, is_password_enabled, \
             expiration_date, is_expiration_enabled) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING *",
        )
        .bind(ShareId::new())
        .bind(data.user_id)
        .bind(data.shareable_type)
        .bind(data.file_id)
        .bind(data.folder_id)
        .bind(&data.shared_url)
        .bind(&data.shared_with)
        .bind(&data.message)
        .bind(&data.password_hash)
        .bind(data.is_password_enabled)
        .bind(data.expiration_date)
        .bind(data.is_expiration_enabled)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("shared_items_shared_url_key") =>
            {
                AppError::conflict("Share token already in use")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create share", e),
        })
    }

    /// Find a share by its URL token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<SharedItem>> {
        sqlx::query_as::<_, SharedItem>("SELECT * FROM shared_items WHERE shared_url = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
            })
    }

    /// Newest password-free, non-expiring share a user created for an item.
    pub async fn find_open_for_item(
        &self,
        user_id: UserId,
        item_id: Uuid,
    ) -> AppResult<Option<SharedItem>> {
        sqlx::query_as::<_, SharedItem>(
            "SELECT * FROM shared_items \
             WHERE user_id = $1 AND (file_id = $2 OR folder_id = $2) \
             AND is_password_enabled = FALSE AND is_expiration_enabled = FALSE \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    /// Newest password-protected share for an item.
    pub async fn find_password_share(&self, item_id: Uuid) -> AppResult<Option<SharedItem>> {
        sqlx::query_as::<_, SharedItem>(
            "SELECT * FROM shared_items \
             WHERE (file_id = $1 OR folder_id = $1) AND is_password_enabled = TRUE \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }
}
