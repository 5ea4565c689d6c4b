//! Per-user storage accounting.
//!
//! Usage is an append-only series of snapshots; the newest one is the
//! current figure. Every transaction that changes a user's usage takes the
//! user's row lock through [`QuotaLedger::lock_owner`] before it writes any
//! file or folder row. Writers for one user then queue behind each other in
//! a single lock order until the surrounding transaction ends.

use sqlx::PgConnection;
use tracing::{debug, warn};

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::types::UserId;
use drivebox_database::repositories::{StorageSnapshotRepository, UserRepository};
use drivebox_entity::storage::{CreateStorageSnapshot, QuotaFigures, StorageSnapshot};
use drivebox_entity::user::User;

/// Message returned to clients when a write would pass the quota.
pub const QUOTA_EXCEEDED_MESSAGE: &str = "Storage limit exceeded. File not saved.";

const FILE_STORAGE_TYPE: &str = "file";

/// Reads and appends storage usage snapshots.
#[derive(Debug, Clone)]
pub struct QuotaLedger {
    users: UserRepository,
    snapshots: StorageSnapshotRepository,
}

impl QuotaLedger {
    pub fn new(users: UserRepository, snapshots: StorageSnapshotRepository) -> Self {
        Self { users, snapshots }
    }

    /// Lock the user's row for the rest of the caller's transaction.
    ///
    /// Must be the first write-side statement of any transaction that later
    /// touches `files` or `folders` and then the ledger.
    pub async fn lock_owner(&self, conn: &mut PgConnection, user_id: UserId) -> AppResult<User> {
        self.users
            .lock_for_update(user_id, &mut *conn)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Admit `size` more bytes for the user, or fail with `QuotaExceeded`.
    ///
    /// Must run inside the caller's transaction. On success the new
    /// snapshot is part of that transaction and is discarded with it on
    /// rollback.
    pub async fn check_and_account(
        &self,
        conn: &mut PgConnection,
        user_id: UserId,
        size: i64,
        location: &str,
    ) -> AppResult<StorageSnapshot> {
        let user = self.lock_owner(conn, user_id).await?;

        let prior = self
            .snapshots
            .latest(user_id, &mut *conn)
            .await?
            .map_or(0, |s| s.used_storage);

        if QuotaFigures::would_exceed(prior, size, user.max_storage_size) {
            warn!(
                user_id = %user_id,
                prior,
                size,
                limit = user.max_storage_size,
                "Upload rejected: storage quota exceeded"
            );
            return Err(AppError::quota_exceeded(QUOTA_EXCEEDED_MESSAGE));
        }

        let figures = QuotaFigures::compute(prior + size, user.max_storage_size);
        debug!(
            user_id = %user_id,
            used = figures.used_storage,
            percentage = figures.usage_percentage,
            "Accounted storage"
        );
        self.snapshots
            .append(
                &CreateStorageSnapshot {
                    user_id,
                    figures,
                    storage_type: FILE_STORAGE_TYPE.to_string(),
                    storage_location: location.to_string(),
                },
                &mut *conn,
            )
            .await
    }

    /// Give back `size` bytes after a permanent deletion. Usage never
    /// drops below zero.
    ///
    /// `owner` must come from [`QuotaLedger::lock_owner`] on the same
    /// connection.
    pub async fn release(
        &self,
        conn: &mut PgConnection,
        owner: &User,
        size: i64,
        location: &str,
    ) -> AppResult<StorageSnapshot> {
        let user_id = owner.id;
        let prior = self
            .snapshots
            .latest(user_id, &mut *conn)
            .await?
            .map_or(0, |s| s.used_storage);

        let figures = QuotaFigures::compute((prior - size).max(0), owner.max_storage_size);
        self.snapshots
            .append(
                &CreateStorageSnapshot {
                    user_id,
                    figures,
                    storage_type: FILE_STORAGE_TYPE.to_string(),
                    storage_location: location.to_string(),
                },
                &mut *conn,
            )
            .await
    }

    /// The user's current usage, zero if nothing was ever accounted.
    pub async fn current_usage(&self, user_id: UserId) -> AppResult<QuotaFigures> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        let used = self
            .snapshots
            .latest(user_id, self.snapshots.pool())
            .await?
            .map_or(0, |s| s.used_storage);
        Ok(QuotaFigures::compute(used, user.max_storage_size))
    }
}
