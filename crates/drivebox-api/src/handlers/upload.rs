//! Multipart upload handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::UploadResponse;
use crate::error::ApiResult;
use crate::extractors::{AuthUser, UploadForm};
use crate::ingest::{IngestPart, MultipartIngest};
use crate::state::AppState;

/// POST /api/files/upload
///
/// Parts are handled one at a time in the order they arrive. `folderId`
/// and `relativePath` fields apply to the file parts after them.
pub async fn upload_files(
    State(state): State<AppState>,
    auth: AuthUser,
    UploadForm(multipart): UploadForm,
) -> ApiResult<Json<UploadResponse>> {
    let mut session = state.upload_service.begin(&auth).await?;
    let mut ingest = MultipartIngest::new(multipart);

    loop {
        let part = match ingest.next_part().await {
            Ok(Some(part)) => part,
            Ok(None) => break,
            // A body that breaks inside a file part fails that part first;
            // its outcome decides the response.
            Err(e) if session.has_failure() => {
                tracing::warn!(user_id = %auth.user_id, error = %e, "Upload body ended early");
                break;
            }
            Err(e) => return Err(e.into()),
        };
        match part {
            IngestPart::Field { name, value } => session.apply_field(&name, value),
            IngestPart::File(file) => {
                state
                    .upload_service
                    .accept_file(&auth, &mut session, file)
                    .await;
            }
        }
    }

    let count = session.file_count();
    let files = session.finish()?;
    tracing::info!(user_id = %auth.user_id, count, "Upload request complete");

    Ok(Json(UploadResponse {
        message: "Files uploaded successfully".to_string(),
        files,
    }))
}
