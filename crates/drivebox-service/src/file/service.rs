//! File operations on behalf of an authenticated user.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::{ByteStream, StorageProvider};
use drivebox_core::types::{FileId, FolderId};
use drivebox_database::repositories::file::FileLocation;
use drivebox_database::repositories::{FileRepository, FolderRepository};
use drivebox_entity::activity::{ActivityAction, CreateActivity};
use drivebox_entity::file::{CreateFile, File, FileCategory};
use drivebox_entity::share::ShareableType;
use drivebox_entity::storage::QuotaFigures;
use drivebox_storage::PublicUrlBuilder;
use drivebox_storage::classify::{
    AUDIO_LABEL, IMAGE_LABELS, PDF_LABEL, SPREADSHEET_LABELS, VIDEO_LABEL, WORD_LABEL,
};
use drivebox_storage::paths::sanitize_segment;

use crate::context::RequestContext;
use crate::folder::FolderService;
use crate::quota::QuotaLedger;
use crate::recorder::MetadataRecorder;

const FILE_NOT_FOUND: &str = "File not found";
const FILE_NOT_ON_DISK: &str = "File not found on the server";

/// File listing, mutation, deletion, and download.
#[derive(Debug, Clone)]
pub struct FileService {
    pool: PgPool,
    files: FileRepository,
    folder_repo: FolderRepository,
    folders: Arc<FolderService>,
    provider: Arc<dyn StorageProvider>,
    ledger: Arc<QuotaLedger>,
    recorder: Arc<MetadataRecorder>,
    urls: PublicUrlBuilder,
    public_app_url: String,
}

impl FileService {
    /// Creates a new file service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pool: PgPool,
        files: FileRepository,
        folder_repo: FolderRepository,
        folders: Arc<FolderService>,
        provider: Arc<dyn StorageProvider>,
        ledger: Arc<QuotaLedger>,
        recorder: Arc<MetadataRecorder>,
        urls: PublicUrlBuilder,
        public_app_url: impl Into<String>,
    ) -> Self {
        Self {
            pool,
            files,
            folder_repo,
            folders,
            provider,
            ledger,
            recorder,
            urls,
            public_app_url: public_app_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn owned_file(&self, ctx: &RequestContext, id: FileId) -> AppResult<File> {
        self.files
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(FILE_NOT_FOUND))
    }

    async fn log(&self, ctx: &RequestContext, action: ActivityAction, file: &File) {
        self.recorder
            .record_activity(
                ctx,
                &CreateActivity::for_file(
                    action,
                    file.id,
                    &file.file_path,
                    file.size,
                    &file.file_type,
                ),
            )
            .await;
    }

    /// Non-trashed files in a folder, or in the root folder.
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        folder_id: Option<FolderId>,
    ) -> AppResult<Vec<File>> {
        let user = self.folders.load_user(ctx.user_id).await?;
        let folder = match folder_id {
            Some(id) => self
                .folder_repo
                .find_owned(id, user.id)
                .await?
                .ok_or_else(|| AppError::not_found("Folder not found"))?,
            None => self.folders.ensure_root(&user).await?,
        };
        self.files.list_in_folder(user.id, folder.id).await
    }

    /// Files in one of the browser's fixed categories.
    pub async fn list_category(
        &self,
        ctx: &RequestContext,
        category: FileCategory,
    ) -> AppResult<Vec<File>> {
        let user_id = ctx.user_id;
        match category {
            FileCategory::Trashed => self.files.list_trashed(user_id).await,
            FileCategory::Videos => self.files.list_by_type(user_id, &[VIDEO_LABEL], None).await,
            FileCategory::Audio => self.files.list_by_type(user_id, &[AUDIO_LABEL], None).await,
            FileCategory::Pdf => {
                self.files
                    .list_by_type(user_id, &[PDF_LABEL], Some("application/pdf"))
                    .await
            }
            FileCategory::Word => self.files.list_by_type(user_id, &[WORD_LABEL], None).await,
            FileCategory::Photos => {
                self.files
                    .list_by_type(user_id, IMAGE_LABELS, Some("image/%"))
                    .await
            }
            FileCategory::Excel => {
                self.files
                    .list_by_type(user_id, SPREADSHEET_LABELS, None)
                    .await
            }
            FileCategory::Shared => self.files.list_shared_by(user_id).await,
            FileCategory::SharedWithMe => {
                let user = self.folders.load_user(user_id).await?;
                self.files.list_shared_with(&user.email).await
            }
        }
    }

    /// A single file record.
    pub async fn get_file(&self, ctx: &RequestContext, id: FileId) -> AppResult<File> {
        self.owned_file(ctx, id).await
    }

    /// Rename a file within its directory.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        id: FileId,
        new_name: &str,
    ) -> AppResult<File> {
        let file = self.owned_file(ctx, id).await?;
        let new_name = sanitize_segment(new_name)?;
        if new_name == file.name {
            return Ok(file);
        }

        let old_path = PathBuf::from(&file.file_path);
        let new_path = match old_path.parent() {
            Some(dir) => dir.join(new_name),
            None => return Err(AppError::internal("Stored file path has no directory")),
        };
        if self.provider.exists(&new_path).await? {
            return Err(AppError::conflict(format!(
                "A file named '{new_name}' already exists in this folder"
            )));
        }

        let user = self.folders.load_user(ctx.user_id).await?;
        let file_url = self.urls.file_url(&user.email, new_name);
        let file_path = new_path.to_string_lossy();
        let location = FileLocation {
            folder_id: file.folder_id,
            name: new_name,
            file_path: &file_path,
            file_url: &file_url,
        };

        let renamed = self
            .relocate(&old_path, &new_path, id, &location)
            .await?;
        self.log(ctx, ActivityAction::RenameFile, &renamed).await;
        info!(user_id = %ctx.user_id, file_id = %id, name = %renamed.name, "File renamed");
        Ok(renamed)
    }

    /// Move a file into another folder.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        id: FileId,
        new_folder_id: FolderId,
    ) -> AppResult<File> {
        let file = self
            .files
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "File not found or you do not have permission to move this file.",
                )
            })?;
        let folder = self
            .folder_repo
            .find_owned(new_folder_id, ctx.user_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Destination folder not found or you do not have permission to access it.",
                )
            })?;
        if file.folder_id == Some(folder.id) {
            return Ok(file);
        }

        let old_path = PathBuf::from(&file.file_path);
        let new_path = Path::new(&folder.folder_path).join(&file.name);
        if self.provider.exists(&new_path).await? {
            return Err(AppError::conflict(format!(
                "A file named '{}' already exists in the destination folder",
                file.name
            )));
        }

        let file_path = new_path.to_string_lossy();
        let location = FileLocation {
            folder_id: Some(folder.id),
            name: &file.name,
            file_path: &file_path,
            file_url: &file.file_url,
        };
        let moved = self
            .relocate(&old_path, &new_path, id, &location)
            .await?;

        if let Some(previous) = file.folder_id {
            self.folder_repo
                .add_size(previous, -file.size, self.folder_repo.pool())
                .await?;
        }
        self.folder_repo
            .add_size(folder.id, file.size, self.folder_repo.pool())
            .await?;

        self.log(ctx, ActivityAction::MoveFile, &moved).await;
        info!(user_id = %ctx.user_id, file_id = %id, folder_id = %folder.id, "File moved");
        Ok(moved)
    }

    /// Rename on disk, then update the row. Puts the bytes back if the row
    /// update fails.
    async fn relocate(
        &self,
        from: &Path,
        to: &Path,
        id: FileId,
        location: &FileLocation<'_>,
    ) -> AppResult<File> {
        self.provider.rename(from, to).await?;
        match self.files.update_location(id, location).await {
            Ok(file) => Ok(file),
            Err(e) => {
                if let Err(undo) = self.provider.rename(to, from).await {
                    warn!(
                        from = %to.display(),
                        to = %from.display(),
                        error = %undo,
                        "Failed to restore file after update error"
                    );
                }
                Err(e)
            }
        }
    }

    /// Copy a file next to itself as "Copy of {name}".
    pub async fn copy_file(&self, ctx: &RequestContext, id: FileId) -> AppResult<File> {
        let file = self.owned_file(ctx, id).await?;
        let source = PathBuf::from(&file.file_path);
        let dir = source
            .parent()
            .ok_or_else(|| AppError::internal("Stored file path has no directory"))?
            .to_path_buf();
        if !self.provider.exists(&source).await? {
            return Err(AppError::not_found(FILE_NOT_ON_DISK));
        }

        let mut name = format!("Copy of {}", file.name);
        let mut attempt = 2;
        while self.provider.exists(&dir.join(&name)).await? {
            name = format!("Copy {attempt} of {}", file.name);
            attempt += 1;
        }
        let dest = dir.join(&name);

        let size = self.provider.copy(&source, &dest).await?;
        let user = self.folders.load_user(ctx.user_id).await?;
        let data = CreateFile {
            user_id: user.id,
            folder_id: file.folder_id,
            file_url: self.urls.file_url(&user.email, &name),
            file_path: dest.to_string_lossy().into_owned(),
            name,
            mime_type: file.mime_type.clone(),
            file_type: file.file_type.clone(),
            size: i64::try_from(size).unwrap_or(i64::MAX),
        };

        let location = dir.to_string_lossy();
        let outcome = async {
            let mut tx = self.pool.begin().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
            })?;
            self.ledger
                .check_and_account(&mut tx, user.id, data.size, &location)
                .await?;
            let copy = self
                .recorder
                .record_file(&mut tx, ctx, &data, ActivityAction::CopyFile)
                .await?;
            tx.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to commit copy", e)
            })?;
            Ok::<_, AppError>(copy)
        }
        .await;

        match outcome {
            Ok(copy) => {
                info!(user_id = %user.id, file_id = %copy.id, source_id = %id, "File copied");
                Ok(copy)
            }
            Err(e) => {
                if let Err(cleanup) = self.provider.delete(&dest).await {
                    warn!(path = %dest.display(), error = %cleanup, "Failed to remove rejected copy");
                }
                Err(e)
            }
        }
    }

    /// Mark a file as trashed.
    pub async fn move_to_trash(&self, ctx: &RequestContext, id: FileId) -> AppResult<File> {
        self.owned_file(ctx, id).await?;
        let file = self.files.set_trashed(id, true).await?;
        self.log(ctx, ActivityAction::TrashFile, &file).await;
        Ok(file)
    }

    /// Take a file out of the trash.
    pub async fn restore_file(&self, ctx: &RequestContext, id: FileId) -> AppResult<File> {
        let file = self
            .files
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File with ID {id} not found.")))?;
        if !file.trashed {
            return Err(AppError::validation(format!(
                "File with ID {id} is not in trash."
            )));
        }
        let file = self.files.set_trashed(id, false).await?;
        self.log(ctx, ActivityAction::RestoreFile, &file).await;
        Ok(file)
    }

    /// Set the locked flag.
    pub async fn set_locked(
        &self,
        ctx: &RequestContext,
        id: FileId,
        locked: bool,
    ) -> AppResult<File> {
        self.owned_file(ctx, id).await?;
        let file = self.files.set_locked(id, locked).await?;
        let action = if locked {
            ActivityAction::LockFile
        } else {
            ActivityAction::UnlockFile
        };
        self.log(ctx, action, &file).await;
        Ok(file)
    }

    /// Delete a file or folder for good, rows and bytes together.
    ///
    /// `item_type` is `File` or `Folder`. Returns the confirmation message.
    pub async fn delete_permanently(
        &self,
        ctx: &RequestContext,
        item_type: &str,
        id: Uuid,
    ) -> AppResult<String> {
        let kind: ShareableType = item_type.parse().map_err(AppError::validation)?;
        let activity = match kind {
            ShareableType::File => self.delete_file(ctx, FileId::from(id)).await?,
            ShareableType::Folder => self.delete_folder(ctx, FolderId::from(id)).await?,
        };
        // The subject row is gone, so the record keeps only its path.
        self.recorder.record_activity(ctx, &activity).await;
        info!(user_id = %ctx.user_id, item_type = %kind, id = %id, "Item deleted permanently");
        Ok(format!("{kind} with ID {id} deleted permanently."))
    }

    async fn delete_file(&self, ctx: &RequestContext, id: FileId) -> AppResult<CreateActivity> {
        let file = self.owned_file(ctx, id).await?;
        let path = PathBuf::from(&file.file_path);
        let location = path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        let owner = self.ledger.lock_owner(&mut tx, ctx.user_id).await?;
        self.files.delete(id, &mut *tx).await?;
        if let Some(folder_id) = file.folder_id {
            self.folder_repo.add_size(folder_id, -file.size, &mut *tx).await?;
        }
        self.ledger
            .release(&mut tx, &owner, file.size, &location)
            .await?;
        self.provider.delete(&path).await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit deletion", e)
        })?;

        Ok(CreateActivity {
            action: ActivityAction::DeleteFile,
            file_id: None,
            folder_id: None,
            file_path: Some(file.file_path),
            file_size: Some(file.size),
            file_type: Some(file.file_type),
        })
    }

    async fn delete_folder(
        &self,
        ctx: &RequestContext,
        id: FolderId,
    ) -> AppResult<CreateActivity> {
        let folder = self
            .folder_repo
            .find_owned(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if folder.is_root() {
            return Err(AppError::validation("The root folder cannot be deleted."));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;
        let owner = self.ledger.lock_owner(&mut tx, ctx.user_id).await?;
        let contained = self.files.total_size_under(id, &mut *tx).await?;
        self.folder_repo.delete(id, &mut *tx).await?;
        if contained > 0 {
            self.ledger
                .release(&mut tx, &owner, contained, &folder.folder_path)
                .await?;
        }
        self.provider
            .delete_dir(Path::new(&folder.folder_path))
            .await?;
        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit deletion", e)
        })?;

        Ok(CreateActivity {
            action: ActivityAction::DeleteFolder,
            file_id: None,
            folder_id: None,
            file_path: Some(folder.folder_path),
            file_size: Some(contained),
            file_type: None,
        })
    }

    async fn open(&self, file: File) -> AppResult<(File, ByteStream<'static>)> {
        let path = PathBuf::from(&file.file_path);
        if !self.provider.exists(&path).await? {
            return Err(AppError::not_found(FILE_NOT_ON_DISK));
        }
        let stream = self.provider.read(&path).await?;
        Ok((file, stream))
    }

    /// The user's file and a stream of its bytes.
    pub async fn open_download(
        &self,
        ctx: &RequestContext,
        id: FileId,
    ) -> AppResult<(File, ByteStream<'static>)> {
        let file = self.owned_file(ctx, id).await?;
        self.open(file).await
    }

    /// Any file by id, for the public preview route.
    pub async fn open_preview(&self, id: FileId) -> AppResult<(File, ByteStream<'static>)> {
        let file = self
            .files
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(FILE_NOT_FOUND))?;
        self.open(file).await
    }

    /// Public preview link for one of the user's files.
    pub async fn share_link(&self, ctx: &RequestContext, id: FileId) -> AppResult<String> {
        let file = self.owned_file(ctx, id).await?;
        Ok(format!("{}/api/files/preview/{}", self.public_app_url, file.id))
    }

    /// Current storage usage for the user.
    pub async fn storage_usage(&self, ctx: &RequestContext) -> AppResult<QuotaFigures> {
        self.ledger.current_usage(ctx.user_id).await
    }
}
