//! Activity record entity model.

use chrono::{DateTime, Utc};
use drivebox_core::types::{ActivityId, FileId, FolderId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::action::ActivityAction;

/// An immutable record of a mutation on a file or folder.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Unique record identifier.
    pub id: ActivityId,
    /// The user who performed the action.
    pub user_id: UserId,
    /// Subject file (cleared if the file is later deleted).
    pub file_id: Option<FileId>,
    /// Subject folder (cleared if the folder is later deleted).
    pub folder_id: Option<FolderId>,
    /// `"File"` or `"Folder"`.
    pub activity_type: String,
    /// Action verb, e.g. `"CREATE FILE"`.
    pub action: String,
    /// Path of the subject at the time of the action.
    pub file_path: Option<String>,
    /// Size of the subject in bytes.
    pub file_size: Option<i64>,
    /// Type label of the subject.
    pub file_type: Option<String>,
    /// Requester IP address.
    pub ip_address: String,
    /// Requester User-Agent.
    pub user_agent: String,
    /// Requester device type.
    pub device: String,
    /// Requester operating system.
    pub operating_system: String,
    /// Requester browser.
    pub browser: String,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Who performed an action and from where.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterInfo {
    pub ip_address: String,
    pub user_agent: String,
    pub device: String,
    pub operating_system: String,
    pub browser: String,
}

/// Data required to append an activity record.
///
/// Requester fields are filled in from the request context by the recorder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActivity {
    /// Action performed.
    pub action: ActivityAction,
    /// Subject file.
    pub file_id: Option<FileId>,
    /// Subject folder.
    pub folder_id: Option<FolderId>,
    /// Path of the subject.
    pub file_path: Option<String>,
    /// Size of the subject.
    pub file_size: Option<i64>,
    /// Type label of the subject.
    pub file_type: Option<String>,
}

impl CreateActivity {
    /// Describe an action on a file.
    pub fn for_file(
        action: ActivityAction,
        file_id: FileId,
        file_path: &str,
        file_size: i64,
        file_type: &str,
    ) -> Self {
        Self {
            action,
            file_id: Some(file_id),
            folder_id: None,
            file_path: Some(file_path.to_string()),
            file_size: Some(file_size),
            file_type: Some(file_type.to_string()),
        }
    }

    /// Describe an action on a folder.
    pub fn for_folder(action: ActivityAction, folder_id: FolderId, folder_path: &str) -> Self {
        Self {
            action,
            file_id: None,
            folder_id: Some(folder_id),
            file_path: Some(folder_path.to_string()),
            file_size: None,
            file_type: None,
        }
    }
}
