//! User entity model.

use chrono::{DateTime, Utc};
use drivebox_core::types::{FolderId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A registered DriveBox user.
///
/// Users are provisioned by the external identity service; this crate only
/// reads them and maintains `root_folder_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Email address. Also names the user's directory in the blob store.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Storage quota in bytes.
    pub max_storage_size: i64,
    /// The user's root folder, once created.
    pub root_folder_id: Option<FolderId>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
