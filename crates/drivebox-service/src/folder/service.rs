//! Folder lookup and creation.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::types::{FolderId, UserId};
use drivebox_database::repositories::{FolderRepository, UserRepository};
use drivebox_entity::activity::{ActivityAction, CreateActivity};
use drivebox_entity::folder::{CreateFolder, Folder};
use drivebox_entity::user::User;
use drivebox_storage::PathResolver;
use drivebox_storage::paths::sanitize_segment;

use crate::context::RequestContext;
use crate::recorder::MetadataRecorder;

/// Resolves where content lands and creates folders on demand.
#[derive(Debug, Clone)]
pub struct FolderService {
    users: UserRepository,
    folders: FolderRepository,
    resolver: Arc<PathResolver>,
    recorder: Arc<MetadataRecorder>,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        users: UserRepository,
        folders: FolderRepository,
        resolver: Arc<PathResolver>,
        recorder: Arc<MetadataRecorder>,
    ) -> Self {
        Self {
            users,
            folders,
            resolver,
            recorder,
        }
    }

    /// Load a user or fail with 404.
    pub async fn load_user(&self, user_id: UserId) -> AppResult<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// The user's root folder, created (directory and row) on first use.
    pub async fn ensure_root(&self, user: &User) -> AppResult<Folder> {
        if let Some(root_id) = user.root_folder_id {
            if let Some(root) = self.folders.find_by_id(root_id).await? {
                return Ok(root);
            }
        }

        let dir = self.resolver.ensure_user_root(&user.email).await?;
        let root = self
            .folders
            .find_or_create(&CreateFolder {
                user_id: user.id,
                parent_id: None,
                name: user.email.clone(),
                folder_path: dir.to_string_lossy().into_owned(),
            })
            .await?;

        if self
            .users
            .set_root_folder(user.id, root.id, self.users.pool())
            .await?
        {
            info!(user_id = %user.id, folder_id = %root.id, "Created root folder");
        }
        Ok(root)
    }

    /// The folder new content should go into: `folder_id` if the user owns
    /// it, else the user's root folder.
    pub async fn resolve_destination(
        &self,
        user: &User,
        folder_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        if let Some(id) = folder_id {
            if let Some(folder) = self.folders.find_owned(id, user.id).await? {
                return Ok(folder);
            }
            debug!(user_id = %user.id, folder_id = %id, "Unknown folder, using root");
        }
        self.ensure_root(user).await
    }

    /// Walk `segments` below `base`, finding or creating each folder row
    /// and its directory. Returns the deepest folder, or `base` itself when
    /// there are no segments.
    pub async fn find_or_create_path(
        &self,
        user_id: UserId,
        base: &Folder,
        segments: &[String],
    ) -> AppResult<Folder> {
        let mut current = base.clone();
        for segment in segments {
            let dir = self
                .resolver
                .ensure_dir(Path::new(&current.folder_path), std::slice::from_ref(segment))
                .await?;
            current = self
                .folders
                .find_or_create(&CreateFolder {
                    user_id,
                    parent_id: Some(current.id),
                    name: segment.clone(),
                    folder_path: dir.to_string_lossy().into_owned(),
                })
                .await?;
        }
        Ok(current)
    }

    /// Create a named folder under `parent_id`, or under the root folder.
    /// Creating a folder that already exists returns the existing one.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> AppResult<Folder> {
        let user = self.load_user(ctx.user_id).await?;
        let name = sanitize_segment(name)?.to_string();

        let parent = match parent_id {
            Some(id) => self
                .folders
                .find_owned(id, user.id)
                .await?
                .ok_or_else(|| AppError::not_found("Parent folder not found"))?,
            None => self.ensure_root(&user).await?,
        };

        let folder = self
            .find_or_create_path(user.id, &parent, std::slice::from_ref(&name))
            .await?;

        self.recorder
            .record_activity(
                ctx,
                &CreateActivity::for_folder(
                    ActivityAction::CreateFolder,
                    folder.id,
                    &folder.folder_path,
                ),
            )
            .await;

        info!(user_id = %user.id, folder_id = %folder.id, "Folder created");
        Ok(folder)
    }
}
