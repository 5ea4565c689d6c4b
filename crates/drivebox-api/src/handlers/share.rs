//! Share handlers, including the public link and password routes.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use uuid::Uuid;

use drivebox_entity::file::File;
use drivebox_service::share::SharedItemView;

use crate::dto::request::{CheckPasswordRequest, ShareRequest};
use crate::dto::response::{CopyLinkResponse, ShareResponse};
use crate::error::ApiResult;
use crate::extractors::{AuthUser, PathParam, ValidatedJson};
use crate::state::AppState;

/// POST /api/files/share
pub async fn share_item(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(req): ValidatedJson<ShareRequest>,
) -> ApiResult<Json<ShareResponse>> {
    let url = state.share_service.share_item(&auth, req.into()).await?;
    Ok(Json(ShareResponse {
        message: "success".to_string(),
        url,
    }))
}

/// GET /api/files/{id}/copy-link
pub async fn copy_link(
    State(state): State<AppState>,
    auth: AuthUser,
    PathParam(id): PathParam<Uuid>,
) -> ApiResult<Json<CopyLinkResponse>> {
    let url = state.share_service.copy_link(&auth, id).await?;
    Ok(Json(CopyLinkResponse { url }))
}

/// GET /api/files/shared/{token}, public.
pub async fn shared_item(
    State(state): State<AppState>,
    PathParam(token): PathParam<String>,
) -> ApiResult<Json<SharedItemView>> {
    let view = state.share_service.shared_item(&token).await?;
    Ok(Json(view))
}

/// POST /api/files/check-password, public.
pub async fn check_password(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CheckPasswordRequest>,
) -> ApiResult<(StatusCode, Json<File>)> {
    let file = state
        .share_service
        .check_password(req.password.as_deref(), req.file_id)
        .await?;
    Ok((StatusCode::CREATED, Json(file)))
}
