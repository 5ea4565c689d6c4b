//! Folder entity model.

use chrono::{DateTime, Utc};
use drivebox_core::types::{FolderId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A folder in a user's tree.
///
/// `folder_path` is the absolute on-disk directory and is unique per user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The folder owner.
    pub user_id: UserId,
    /// Parent folder (`None` for a root folder).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Absolute directory on disk.
    pub folder_path: String,
    /// Advisory aggregate size of the files placed directly in this folder.
    pub size: i64,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Returns `true` if this is a root folder.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Data required to create a new folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// The folder owner.
    pub user_id: UserId,
    /// Parent folder.
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Absolute directory on disk.
    pub folder_path: String,
}
