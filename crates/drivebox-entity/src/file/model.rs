//! File entity model.

use chrono::{DateTime, Utc};
use drivebox_core::types::{FileId, FolderId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A file stored in DriveBox.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct File {
    /// Unique file identifier.
    pub id: FileId,
    /// The file owner.
    pub user_id: UserId,
    /// The folder containing this file.
    pub folder_id: Option<FolderId>,
    /// The file name (including extension).
    pub name: String,
    /// Absolute path of the bytes on disk.
    pub file_path: String,
    /// Public URL the bytes are served from.
    pub file_url: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Human-readable type label (e.g. "Video File").
    pub file_type: String,
    /// Size in bytes.
    pub size: i64,
    /// Whether the file is in the trash.
    pub trashed: bool,
    /// Whether the file is locked against edits.
    pub locked: bool,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFile {
    /// The file owner.
    pub user_id: UserId,
    /// The folder to place the file in.
    pub folder_id: Option<FolderId>,
    /// The file name.
    pub name: String,
    /// Absolute path of the bytes on disk.
    pub file_path: String,
    /// Public URL.
    pub file_url: String,
    /// Declared MIME type.
    pub mime_type: String,
    /// Type label.
    pub file_type: String,
    /// Size in bytes.
    pub size: i64,
}
