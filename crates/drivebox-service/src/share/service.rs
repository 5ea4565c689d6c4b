//! Share creation, public lookup, and password checks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{FileId, FolderId};
use drivebox_database::repositories::{FileRepository, FolderRepository, ShareRepository};
use drivebox_entity::activity::{ActivityAction, CreateActivity};
use drivebox_entity::file::File;
use drivebox_entity::share::{CreateSharedItem, ShareableType, SharedItem};

use crate::context::RequestContext;
use crate::recorder::MetadataRecorder;
use crate::share::link::LinkService;
use crate::share::password::PasswordHasher;

const ITEM_NOT_FOUND: &str = "Item not found";
const INVALID_PASSWORD: &str = "Invalid password";
const TOKEN_ATTEMPTS: usize = 3;

/// Input for creating a share.
#[derive(Debug, Clone, Default)]
pub struct ShareRequest {
    /// A file id, or a folder id when no file has it.
    pub file_id: Option<Uuid>,
    pub folder_id: Option<Uuid>,
    pub shared_with: Option<String>,
    pub message: Option<String>,
    pub password: Option<String>,
    pub is_password_enabled: bool,
    pub expiration_date: Option<DateTime<Utc>>,
    pub is_expiration_enabled: bool,
}

/// What an anonymous visitor learns about a shared item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedItemView {
    pub name: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub item_id: Uuid,
    pub is_password_enabled: bool,
    pub shareable_type: ShareableType,
}

/// The item a share points at.
#[derive(Debug)]
enum ShareTarget {
    File { id: FileId, path: String, size: i64, file_type: String },
    Folder { id: FolderId, path: String },
}

/// Creates and resolves share links.
#[derive(Debug, Clone)]
pub struct ShareService {
    shares: ShareRepository,
    files: FileRepository,
    folders: FolderRepository,
    links: LinkService,
    hasher: PasswordHasher,
    recorder: Arc<MetadataRecorder>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        shares: ShareRepository,
        files: FileRepository,
        folders: FolderRepository,
        links: LinkService,
        recorder: Arc<MetadataRecorder>,
    ) -> Self {
        Self {
            shares,
            files,
            folders,
            links,
            hasher: PasswordHasher::new(),
            recorder,
        }
    }

    async fn resolve_target(
        &self,
        ctx: &RequestContext,
        file_id: Option<Uuid>,
        folder_id: Option<Uuid>,
    ) -> AppResult<ShareTarget> {
        if let Some(id) = file_id {
            if let Some(file) = self.files.find_owned(FileId::from(id), ctx.user_id).await? {
                return Ok(ShareTarget::File {
                    id: file.id,
                    path: file.file_path,
                    size: file.size,
                    file_type: file.file_type,
                });
            }
        }
        if let Some(id) = folder_id.or(file_id) {
            if let Some(folder) = self.folders.find_owned(FolderId::from(id), ctx.user_id).await? {
                return Ok(ShareTarget::Folder {
                    id: folder.id,
                    path: folder.folder_path,
                });
            }
        }
        Err(AppError::not_found(ITEM_NOT_FOUND))
    }

    /// Insert a share under a fresh token, retrying on token collisions.
    async fn insert(&self, mut data: CreateSharedItem) -> AppResult<SharedItem> {
        let mut attempt = 1;
        loop {
            match self.shares.create(&data).await {
                Err(e) if e.is(ErrorKind::Conflict) && attempt < TOKEN_ATTEMPTS => {
                    warn!(attempt, "Share token collision, retrying");
                    data.shared_url = self.links.generate_token();
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    fn new_share(&self, ctx: &RequestContext, target: &ShareTarget) -> CreateSharedItem {
        let (shareable_type, file_id, folder_id) = match target {
            ShareTarget::File { id, .. } => (ShareableType::File, Some(*id), None),
            ShareTarget::Folder { id, .. } => (ShareableType::Folder, None, Some(*id)),
        };
        CreateSharedItem {
            user_id: ctx.user_id,
            shareable_type,
            file_id,
            folder_id,
            shared_url: self.links.generate_token(),
            shared_with: None,
            message: None,
            password_hash: None,
            is_password_enabled: false,
            expiration_date: None,
            is_expiration_enabled: false,
        }
    }

    /// Create a share and return its public URL.
    ///
    /// A password is stored only when enabled and non-empty; an expiry
    /// only when enabled.
    pub async fn share_item(&self, ctx: &RequestContext, req: ShareRequest) -> AppResult<String> {
        if req.file_id.is_none() && req.folder_id.is_none() {
            return Err(AppError::validation("Missing required fileId or folderId"));
        }
        let target = self.resolve_target(ctx, req.file_id, req.folder_id).await?;

        let password_hash = match req.password.as_deref() {
            Some(password) if req.is_password_enabled && !password.trim().is_empty() => {
                Some(self.hasher.hash(password)?)
            }
            _ => None,
        };
        let expiration_date = if req.is_expiration_enabled {
            Some(req.expiration_date.ok_or_else(|| {
                AppError::validation("Expiration date is required when expiration is enabled")
            })?)
        } else {
            None
        };
        let shared_with = req
            .shared_with
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty());

        let mut data = self.new_share(ctx, &target);
        data.is_password_enabled = password_hash.is_some();
        data.password_hash = password_hash;
        data.is_expiration_enabled = expiration_date.is_some();
        data.expiration_date = expiration_date;
        data.message = req.message.filter(|m| !m.trim().is_empty());
        data.shared_with = shared_with;

        let share = self.insert(data).await?;

        if let Some(email) = &share.shared_with {
            info!(
                share_id = %share.id,
                shared_with = %email,
                "Share notification email not sent: delivery is not configured"
            );
        }

        let activity = match &target {
            ShareTarget::File { id, path, size, file_type } => {
                CreateActivity::for_file(ActivityAction::ShareFile, *id, path, *size, file_type)
            }
            ShareTarget::Folder { id, path } => {
                CreateActivity::for_folder(ActivityAction::ShareFile, *id, path)
            }
        };
        self.recorder.record_activity(ctx, &activity).await;

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            shareable_type = %share.shareable_type,
            password = share.is_password_enabled,
            expires = share.is_expiration_enabled,
            "Share created"
        );
        Ok(self.links.url_for(&share.shared_url))
    }

    /// URL of an open (no password, no expiry) share for the item, creating
    /// one if none exists.
    pub async fn copy_link(&self, ctx: &RequestContext, item_id: Uuid) -> AppResult<String> {
        if let Some(existing) = self.shares.find_open_for_item(ctx.user_id, item_id).await? {
            return Ok(self.links.url_for(&existing.shared_url));
        }
        let target = self.resolve_target(ctx, Some(item_id), None).await?;
        let share = self.insert(self.new_share(ctx, &target)).await?;
        info!(user_id = %ctx.user_id, share_id = %share.id, "Open share created");
        Ok(self.links.url_for(&share.shared_url))
    }

    /// Public view of a shared item.
    pub async fn shared_item(&self, token: &str) -> AppResult<SharedItemView> {
        let share = self
            .shares
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found(ITEM_NOT_FOUND))?;
        if share.is_expired_at(Utc::now()) {
            return Err(AppError::validation("The link has expired."));
        }

        match share.shareable_type {
            ShareableType::File => {
                let file = match share.file_id {
                    Some(id) => self.files.find_by_id(id).await?,
                    None => None,
                }
                .ok_or_else(|| AppError::validation("File record not found."))?;
                Ok(SharedItemView {
                    name: file.name,
                    size: file.size,
                    mime_type: Some(file.mime_type),
                    item_id: file.id.into_uuid(),
                    is_password_enabled: share.is_password_enabled,
                    shareable_type: ShareableType::File,
                })
            }
            ShareableType::Folder => {
                let folder = match share.folder_id {
                    Some(id) => self.folders.find_by_id(id).await?,
                    None => None,
                }
                .ok_or_else(|| AppError::validation("Folder record not found."))?;
                Ok(SharedItemView {
                    name: folder.name,
                    size: folder.size,
                    mime_type: None,
                    item_id: folder.id.into_uuid(),
                    is_password_enabled: share.is_password_enabled,
                    shareable_type: ShareableType::Folder,
                })
            }
        }
    }

    /// Check a visitor's password against the newest password share of a
    /// file. Returns the file on success.
    pub async fn check_password(
        &self,
        password: Option<&str>,
        file_id: Option<Uuid>,
    ) -> AppResult<File> {
        let (password, file_id) = match (password.filter(|p| !p.is_empty()), file_id) {
            (Some(password), Some(file_id)) => (password, file_id),
            _ => return Err(AppError::validation("Missing required password or fileId")),
        };

        let share = self
            .shares
            .find_password_share(file_id)
            .await?
            .ok_or_else(|| AppError::authentication(INVALID_PASSWORD))?;
        if share.is_expired_at(Utc::now()) {
            return Err(AppError::validation("The link has expired."));
        }
        let hash = share
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::authentication(INVALID_PASSWORD))?;
        if !self.hasher.verify(password, hash)? {
            warn!(share_id = %share.id, "Share password mismatch");
            return Err(AppError::authentication(INVALID_PASSWORD));
        }

        self.files
            .find_by_id(FileId::from(file_id))
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
