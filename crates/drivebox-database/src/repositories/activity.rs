//! File activity repository implementation.

use sqlx::{Executor, PgPool, Postgres};

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{ActivityId, UserId};
use drivebox_entity::activity::{ActivityRecord, CreateActivity, RequesterInfo};

/// Repository for the append-only activity log.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Append an activity record.
    pub async fn create<'e, E>(
        &self,
        user_id: UserId,
        requester: &RequesterInfo,
        data: &CreateActivity,
        executor: E,
    ) -> AppResult<ActivityRecord>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ActivityRecord>(
            "INSERT INTO file_activities (id, user_id, file_id, folder_id, activity_type, action, \
             file_path, file_size, file_type, ip_address, user_agent, device, operating_system, \
             browser) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) RETURNING *",
        )
        .bind(ActivityId::new())
        .bind(user_id)
        .bind(data.file_id)
        .bind(data.folder_id)
        .bind(data.action.activity_type().as_str())
        .bind(data.action.as_str())
        .bind(&data.file_path)
        .bind(data.file_size)
        .bind(&data.file_type)
        .bind(&requester.ip_address)
        .bind(&requester.user_agent)
        .bind(&requester.device)
        .bind(&requester.operating_system)
        .bind(&requester.browser)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to record activity", e))
    }

    /// Most recent activity for a user.
    pub async fn list_recent(&self, user_id: UserId, limit: i64) -> AppResult<Vec<ActivityRecord>> {
        sqlx::query_as::<_, ActivityRecord>(
            "SELECT * FROM file_activities WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity", e))
    }
}
