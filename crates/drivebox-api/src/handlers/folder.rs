//! Folder handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use drivebox_core::types::FolderId;
use drivebox_entity::folder::Folder;

use crate::dto::request::CreateFolderRequest;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, ValidatedJson};
use crate::state::AppState;

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<Folder>)> {
    let folder = state
        .folder_service
        .create_folder(
            &auth,
            &req.folder_name,
            req.parent_folder_id.map(FolderId::from),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(folder)))
}
