//! Request DTOs with validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Rename request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    #[validate(length(min = 1, max = 255, message = "New name is required"))]
    pub new_name: String,
}

/// Move request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MoveFileRequest {
    pub new_folder_id: Uuid,
}

/// Folder creation request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    #[validate(length(min = 1, max = 255, message = "Folder name is required"))]
    pub folder_name: String,
    #[serde(default)]
    pub parent_folder_id: Option<Uuid>,
}

/// Share creation request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareRequest {
    pub file_id: Option<Uuid>,
    pub folder_id: Option<Uuid>,
    #[validate(email(message = "Invalid email address"))]
    pub shared_with: Option<String>,
    pub password: Option<String>,
    pub is_password_enabled: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_expiration_enabled: bool,
    #[validate(length(max = 2000))]
    pub share_with_message: Option<String>,
}

impl From<ShareRequest> for drivebox_service::share::ShareRequest {
    fn from(req: ShareRequest) -> Self {
        Self {
            file_id: req.file_id,
            folder_id: req.folder_id,
            shared_with: req.shared_with,
            message: req.share_with_message,
            password: req.password,
            is_password_enabled: req.is_password_enabled,
            expiration_date: req.expiration_date,
            is_expiration_enabled: req.is_expiration_enabled,
        }
    }
}

/// Share password check body. Both fields are checked by the service so a
/// missing one yields its own message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct CheckPasswordRequest {
    pub password: Option<String>,
    pub file_id: Option<Uuid>,
}

/// Query string for `GET /files`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesQuery {
    pub folder_id: Option<String>,
}
