//! Storage snapshot repository implementation.

use sqlx::{Executor, PgPool, Postgres};

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{SnapshotId, UserId};
use drivebox_entity::storage::{CreateStorageSnapshot, StorageSnapshot};

/// Repository for the append-only storage usage log.
#[derive(Debug, Clone)]
pub struct StorageSnapshotRepository {
    pool: PgPool,
}

impl StorageSnapshotRepository {
    /// Create a new snapshot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// The user's most recent snapshot.
    pub async fn latest<'e, E>(&self, user_id: UserId, executor: E) -> AppResult<Option<StorageSnapshot>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, StorageSnapshot>(
            "SELECT * FROM storage_snapshots WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to read storage usage", e)
        })
    }

    /// Append a snapshot.
    pub async fn append<'e, E>(
        &self,
        data: &CreateStorageSnapshot,
        executor: E,
    ) -> AppResult<StorageSnapshot>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let figures = &data.figures;
        sqlx::query_as::<_, StorageSnapshot>(
            "INSERT INTO storage_snapshots (id, user_id, used_storage, total_storage, \
             storage_type, storage_location, storage_usage_percentage, storage_limit, \
             overflow_storage, notification_sent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(SnapshotId::new())
        .bind(data.user_id)
        .bind(figures.used_storage)
        .bind(figures.storage_limit)
        .bind(&data.storage_type)
        .bind(&data.storage_location)
        .bind(figures.usage_percentage)
        .bind(figures.storage_limit)
        .bind(figures.overflow_storage)
        .bind(figures.notification_sent)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record storage usage", e)
        })
    }
}
