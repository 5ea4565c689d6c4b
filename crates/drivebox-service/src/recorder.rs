//! File records and their audit trail.

use sqlx::{Connection, PgConnection};
use tracing::warn;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_database::repositories::{ActivityRepository, FileRepository, FolderRepository};
use drivebox_entity::activity::{ActivityAction, CreateActivity};
use drivebox_entity::file::{CreateFile, File};

use crate::context::RequestContext;

/// Persists File rows together with their activity records.
#[derive(Debug, Clone)]
pub struct MetadataRecorder {
    files: FileRepository,
    folders: FolderRepository,
    activities: ActivityRepository,
}

impl MetadataRecorder {
    pub fn new(
        files: FileRepository,
        folders: FolderRepository,
        activities: ActivityRepository,
    ) -> Self {
        Self {
            files,
            folders,
            activities,
        }
    }

    /// Insert a file, bump its folder's size, and log `action` for it.
    ///
    /// Runs on the caller's transaction. The activity insert sits in a
    /// savepoint: if it fails the savepoint is rolled back, a warning is
    /// logged, and the file row is kept.
    pub async fn record_file(
        &self,
        conn: &mut PgConnection,
        ctx: &RequestContext,
        data: &CreateFile,
        action: ActivityAction,
    ) -> AppResult<File> {
        let file = self.files.create(data, &mut *conn).await?;
        if let Some(folder_id) = file.folder_id {
            self.folders.add_size(folder_id, file.size, &mut *conn).await?;
        }

        let activity = CreateActivity::for_file(
            action,
            file.id,
            &file.file_path,
            file.size,
            &file.file_type,
        );

        let mut savepoint = conn.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to open savepoint", e)
        })?;
        match self
            .activities
            .create(ctx.user_id, &ctx.requester(), &activity, &mut *savepoint)
            .await
        {
            Ok(_) => savepoint.commit().await.map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to release savepoint", e)
            })?,
            Err(e) => {
                warn!(
                    user_id = %ctx.user_id,
                    file_id = %file.id,
                    action = %action,
                    error = %e,
                    "Activity record failed; keeping file"
                );
                savepoint.rollback().await.map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to roll back savepoint", e)
                })?;
            }
        }

        Ok(file)
    }

    /// Log an activity outside any transaction. Failures are logged only.
    pub async fn record_activity(&self, ctx: &RequestContext, activity: &CreateActivity) {
        if let Err(e) = self
            .activities
            .create(
                ctx.user_id,
                &ctx.requester(),
                activity,
                self.activities.pool(),
            )
            .await
        {
            warn!(
                user_id = %ctx.user_id,
                action = %activity.action,
                error = %e,
                "Failed to record activity"
            );
        }
    }
}
