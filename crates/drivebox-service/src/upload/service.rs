//! Upload orchestration: one call per incoming file part.

use std::path::Path;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::ByteStream;
use drivebox_entity::activity::ActivityAction;
use drivebox_entity::file::{CreateFile, File};
use drivebox_entity::folder::Folder;
use drivebox_entity::user::User;
use drivebox_storage::paths::upload_file_name;
use drivebox_storage::{FileMaterializer, PublicUrlBuilder, classify_file_type};

use crate::context::RequestContext;
use crate::folder::FolderService;
use crate::quota::QuotaLedger;
use crate::recorder::MetadataRecorder;
use crate::upload::session::UploadSession;

/// MIME type recorded when the client declares none.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// One file part of a multipart upload.
pub struct IncomingFile<'a> {
    pub field_name: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub stream: ByteStream<'a>,
}

impl std::fmt::Debug for IncomingFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncomingFile")
            .field("field_name", &self.field_name)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// Stores uploaded files: directory, bytes, quota, then records.
#[derive(Debug, Clone)]
pub struct UploadService {
    pool: PgPool,
    folders: Arc<FolderService>,
    materializer: FileMaterializer,
    ledger: Arc<QuotaLedger>,
    recorder: Arc<MetadataRecorder>,
    urls: PublicUrlBuilder,
}

impl UploadService {
    /// Creates a new upload service.
    pub fn new(
        pool: PgPool,
        folders: Arc<FolderService>,
        materializer: FileMaterializer,
        ledger: Arc<QuotaLedger>,
        recorder: Arc<MetadataRecorder>,
        urls: PublicUrlBuilder,
    ) -> Self {
        Self {
            pool,
            folders,
            materializer,
            ledger,
            recorder,
            urls,
        }
    }

    /// Start a session for the requesting user.
    pub async fn begin(&self, ctx: &RequestContext) -> AppResult<UploadSession> {
        let user = self.folders.load_user(ctx.user_id).await?;
        Ok(UploadSession::new(user))
    }

    /// Store one file part and record its outcome on the session.
    ///
    /// Never fails the request by itself; the session decides the overall
    /// result in [`UploadSession::finish`].
    pub async fn accept_file(
        &self,
        ctx: &RequestContext,
        session: &mut UploadSession,
        file: IncomingFile<'_>,
    ) {
        let original_name = file.file_name.clone();
        let outcome = self.store(ctx, session, file).await;
        match &outcome {
            Ok(stored) => info!(
                user_id = %ctx.user_id,
                file_id = %stored.id,
                name = %stored.name,
                size = stored.size,
                "File uploaded"
            ),
            Err(e) if e.is(ErrorKind::QuotaExceeded) => {}
            Err(e) => warn!(
                user_id = %ctx.user_id,
                name = %original_name,
                error = %e,
                "File upload failed"
            ),
        }
        session.record(outcome);
    }

    async fn store(
        &self,
        ctx: &RequestContext,
        session: &mut UploadSession,
        file: IncomingFile<'_>,
    ) -> AppResult<File> {
        let name = upload_file_name(&file.file_name)?;
        let segments = session.directory_segments()?;

        let base = match session.cached_base() {
            Some(folder) => folder.clone(),
            None => {
                let folder = self
                    .folders
                    .resolve_destination(session.user(), session.requested_folder_id())
                    .await?;
                session.cache_base(folder.clone());
                folder
            }
        };

        let folder = self
            .folders
            .find_or_create_path(session.user().id, &base, &segments)
            .await?;

        let dest = Path::new(&folder.folder_path).join(&name);
        let size = match self.materializer.materialize(&dest, file.stream).await {
            Ok(size) => size,
            Err(e) => {
                self.materializer.discard(&dest).await;
                return Err(e);
            }
        };

        let mime_type = file
            .content_type
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
        let data = CreateFile {
            user_id: session.user().id,
            folder_id: Some(folder.id),
            file_type: classify_file_type(&name, &mime_type),
            file_url: self.urls.file_url(&session.user().email, &name),
            file_path: dest.to_string_lossy().into_owned(),
            mime_type,
            name,
            size: i64::try_from(size)
                .map_err(|_| AppError::validation("File is too large to record"))?,
        };

        match self.commit(ctx, session.user(), &base, &data).await {
            Ok(stored) => Ok(stored),
            Err(e) => {
                self.materializer.discard(&dest).await;
                Err(e)
            }
        }
    }

    /// Quota check, file row, folder size, and activity in one transaction.
    async fn commit(
        &self,
        ctx: &RequestContext,
        user: &User,
        base: &Folder,
        data: &CreateFile,
    ) -> AppResult<File> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        self.ledger
            .check_and_account(&mut tx, user.id, data.size, &base.folder_path)
            .await?;
        let file = self
            .recorder
            .record_file(&mut tx, ctx, data, ActivityAction::CreateFile)
            .await?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit upload", e)
        })?;
        Ok(file)
    }
}
