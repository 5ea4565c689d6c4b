//! File listing, mutation, deletion, and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::Response;
use uuid::Uuid;

use drivebox_core::error::AppError;
use drivebox_core::traits::storage::ByteStream;
use drivebox_core::types::{FileId, FolderId};
use drivebox_entity::file::{File, FileCategory};
use drivebox_storage::url::encode_component;

use crate::dto::request::{ListFilesQuery, MoveFileRequest, RenameFileRequest};
use crate::dto::response::{DeleteResponse, LinkResponse, MoveResponse, RestoreResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PathParam, QueryParams, ValidatedJson};
use crate::state::AppState;

/// GET /api/files?folderId=...
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    QueryParams(query): QueryParams<ListFilesQuery>,
) -> ApiResult<Json<Vec<File>>> {
    let folder_id = match query.folder_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            raw.parse::<FolderId>()
                .map_err(|_| AppError::validation("Invalid folderId"))?,
        ),
    };
    let files = state.file_service.list_files(&auth, folder_id).await?;
    Ok(Json(files))
}

/// GET /api/files/category/{category}
pub async fn list_category(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(category): PathParam<String>,
) -> ApiResult<Json<Vec<File>>> {
    let category: FileCategory = category.parse().map_err(AppError::validation)?;
    let files = state.file_service.list_category(&auth, category).await?;
    Ok(Json(files))
}

/// GET /api/files/{id}
pub async fn get_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<File>> {
    let file = state.file_service.get_file(&auth, FileId::from(id)).await?;
    Ok(Json(file))
}

/// PUT /api/files/{id}/rename
pub async fn rename_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(req): ValidatedJson<RenameFileRequest>,
) -> ApiResult<Json<File>> {
    let file = state
        .file_service
        .rename_file(&auth, FileId::from(id), &req.new_name)
        .await?;
    Ok(Json(file))
}

/// PUT /api/files/{id}/move
pub async fn move_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
    ValidatedJson(req): ValidatedJson<MoveFileRequest>,
) -> ApiResult<Json<MoveResponse>> {
    let file = state
        .file_service
        .move_file(&auth, FileId::from(id), FolderId::from(req.new_folder_id))
        .await?;
    Ok(Json(MoveResponse {
        message: "File moved successfully".to_string(),
        file,
    }))
}

/// POST /api/files/{id}/copy
pub async fn copy_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<(StatusCode, Json<File>)> {
    let copy = state.file_service.copy_file(&auth, FileId::from(id)).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// PUT /api/files/{id}/trash
pub async fn move_to_trash(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<File>> {
    let file = state
        .file_service
        .move_to_trash(&auth, FileId::from(id))
        .await?;
    Ok(Json(file))
}

/// PUT /api/files/{id}/restore
pub async fn restore_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<RestoreResponse>> {
    let file = state
        .file_service
        .restore_file(&auth, FileId::from(id))
        .await?;
    Ok(Json(RestoreResponse {
        success: true,
        file,
    }))
}

/// DELETE /api/files/{itemType}/{id}
pub async fn delete_permanently(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam((item_type, id)): PathParam<(String, Uuid)>,
) -> ApiResult<Json<DeleteResponse>> {
    let success = state
        .file_service
        .delete_permanently(&auth, &item_type, id)
        .await?;
    Ok(Json(DeleteResponse { success }))
}

/// PUT /api/files/{id}/lock
pub async fn lock_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<File>> {
    let file = state
        .file_service
        .set_locked(&auth, FileId::from(id), true)
        .await?;
    Ok(Json(file))
}

/// PUT /api/files/{id}/unlock
pub async fn unlock_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<File>> {
    let file = state
        .file_service
        .set_locked(&auth, FileId::from(id), false)
        .await?;
    Ok(Json(file))
}

/// GET /api/files/{id}/download
pub async fn download_file(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Response> {
    let (file, stream) = state
        .file_service
        .open_download(&auth, FileId::from(id))
        .await?;
    let content_type = mime_guess::from_path(&file.file_path)
        .first_or_octet_stream()
        .to_string();
    let disposition = format!(
        "attachment; filename*=UTF-8''{}",
        encode_component(&file.name)
    );
    Ok(stream_response(stream, &content_type, &disposition)?)
}

/// GET /api/files/preview/{id}, public.
pub async fn preview_file(
    State(state): State<AppState>,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Response> {
    let (file, stream) = state.file_service.open_preview(FileId::from(id)).await?;
    let disposition = format!(
        "inline; filename=\"{}\"; filename*=UTF-8''{}",
        ascii_file_name(&file.name),
        encode_component(&file.name)
    );
    Ok(stream_response(stream, &file.mime_type, &disposition)?)
}

/// GET /api/files/{id}/share-link
pub async fn share_link(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<LinkResponse>> {
    let link = state.file_service.share_link(&auth, FileId::from(id)).await?;
    Ok(Json(LinkResponse { link }))
}

fn stream_response(
    stream: ByteStream<'static>,
    content_type: &str,
    disposition: &str,
) -> Result<Response, AppError> {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))
}

/// A header-safe stand-in for a file name: printable ASCII only, no quotes.
fn ascii_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
