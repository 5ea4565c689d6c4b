//! Storage usage handler.

use axum::Json;
use axum::extract::State;

use drivebox_entity::storage::QuotaFigures;

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/storage/usage
pub async fn usage(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<QuotaFigures>> {
    let figures = state.file_service.storage_usage(&auth).await?;
    Ok(Json(figures))
}
