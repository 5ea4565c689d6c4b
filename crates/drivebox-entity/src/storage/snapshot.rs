//! Storage usage snapshot entity model.

use chrono::{DateTime, Utc};
use drivebox_core::types::{SnapshotId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::quota::QuotaFigures;

/// One entry in a user's append-only storage usage log.
///
/// The most recent snapshot by `created_at` is the user's current usage.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StorageSnapshot {
    /// Unique snapshot identifier.
    pub id: SnapshotId,
    /// The user whose usage this is.
    pub user_id: UserId,
    /// Cumulative bytes in use.
    pub used_storage: i64,
    /// Quota at the time of the snapshot.
    pub total_storage: i64,
    /// What kind of write produced the snapshot (`"file"`).
    pub storage_type: String,
    /// Directory the write landed in.
    pub storage_location: String,
    /// Usage as a percentage of quota, capped at 100.
    pub storage_usage_percentage: f64,
    /// Quota at the time of the snapshot.
    pub storage_limit: i64,
    /// Bytes over quota, or zero.
    pub overflow_storage: i64,
    /// Whether usage crossed the 90% warning threshold.
    pub notification_sent: bool,
    /// When the snapshot was appended.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStorageSnapshot {
    /// The user whose usage this is.
    pub user_id: UserId,
    /// Derived figures for the new usage total.
    pub figures: QuotaFigures,
    /// What kind of write produced the snapshot.
    pub storage_type: String,
    /// Directory the write landed in.
    pub storage_location: String,
}
