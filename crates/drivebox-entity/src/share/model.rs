//! Shared item entity model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use drivebox_core::types::{FileId, FolderId, ShareId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// What kind of item a share points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "shareable_type")]
pub enum ShareableType {
    File,
    Folder,
}

impl fmt::Display for ShareableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => f.write_str("File"),
            Self::Folder => f.write_str("Folder"),
        }
    }
}

impl FromStr for ShareableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "File" | "file" => Ok(Self::File),
            "Folder" | "folder" => Ok(Self::Folder),
            other => Err(format!("Invalid file type: {other}")),
        }
    }
}

/// A link granting access to a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SharedItem {
    /// Unique share identifier.
    pub id: ShareId,
    /// User who created the share.
    pub user_id: UserId,
    /// Kind of item shared.
    pub shareable_type: ShareableType,
    /// Shared file, when `shareable_type` is `File`.
    pub file_id: Option<FileId>,
    /// Shared folder, when `shareable_type` is `Folder`.
    pub folder_id: Option<FolderId>,
    /// Opaque token in the share URL.
    pub shared_url: String,
    /// Email address the item was shared with, if any.
    pub shared_with: Option<String>,
    /// Message for the recipient.
    pub message: Option<String>,
    /// Argon2 hash of the share password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Whether a password is required.
    pub is_password_enabled: bool,
    /// When the link stops working.
    pub expiration_date: Option<DateTime<Utc>>,
    /// Whether `expiration_date` is enforced.
    pub is_expiration_enabled: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl SharedItem {
    /// Id of the shared item regardless of its kind.
    pub fn item_id(&self) -> Option<Uuid> {
        match self.shareable_type {
            ShareableType::File => self.file_id.map(Uuid::from),
            ShareableType::Folder => self.folder_id.map(Uuid::from),
        }
    }

    /// Check whether the link has expired at `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.is_expiration_enabled && self.expiration_date.is_some_and(|expires| expires <= now)
    }

    /// Whether this share needs no password and never expires.
    pub fn is_open(&self) -> bool {
        !self.is_password_enabled && !self.is_expiration_enabled
    }
}

/// Data required to create a new share.
#[derive(Debug, Clone)]
pub struct CreateSharedItem {
    pub user_id: UserId,
    pub shareable_type: ShareableType,
    pub file_id: Option<FileId>,
    pub folder_id: Option<FolderId>,
    pub shared_url: String,
    pub shared_with: Option<String>,
    pub message: Option<String>,
    pub password_hash: Option<String>,
    pub is_password_enabled: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_expiration_enabled: bool,
}
