//! File repository implementation.

use sqlx::{Executor, PgPool, Postgres};

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::{FileId, FolderId, UserId};
use drivebox_entity::file::{CreateFile, File};

/// New location for a file after a rename or move.
#[derive(Debug, Clone)]
pub struct FileLocation<'a> {
    pub folder_id: Option<FolderId>,
    pub name: &'a str,
    pub file_path: &'a str,
    pub file_url: &'a str,
}

/// Repository for file CRUD and listing queries.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Return the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Find a file by ID, restricted to one owner.
    pub async fn find_owned(&self, id: FileId, user_id: UserId) -> AppResult<Option<File>> {
        sqlx::query_as::<_, File>("SELECT * FROM files WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// Insert a new file record.
    pub async fn create<'e, E>(&self, data: &CreateFile, executor: E) -> AppResult<File>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, File>(
            "INSERT INTO files (id, user_id, folder_id, name, file_path, file_url, mime_type, \
             file_type, size) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(FileId::new())
        .bind(data.user_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .bind(&data.file_path)
        .bind(&data.file_url)
        .bind(&data.mime_type)
        .bind(&data.file_type)
        .bind(data.size)
        .fetch_one(executor)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file", e))
    }

    /// List a user's non-trashed files in one folder.
    pub async fn list_in_folder(&self, user_id: UserId, folder_id: FolderId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = $1 AND folder_id = $2 AND trashed = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List a user's trashed files.
    pub async fn list_trashed(&self, user_id: UserId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = $1 AND trashed = TRUE ORDER BY updated_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list trash", e))
    }

    /// List a user's non-trashed files whose label is one of `labels`, or
    /// whose MIME type matches the SQL `LIKE` pattern `mime_pattern`.
    pub async fn list_by_type(
        &self,
        user_id: UserId,
        labels: &[&str],
        mime_pattern: Option<&str>,
    ) -> AppResult<Vec<File>> {
        let labels: Vec<String> = labels.iter().map(|l| (*l).to_string()).collect();
        sqlx::query_as::<_, File>(
            "SELECT * FROM files WHERE user_id = $1 AND trashed = FALSE \
             AND (file_type = ANY($2) OR ($3::TEXT IS NOT NULL AND mime_type LIKE $3)) \
             ORDER BY created_at DESC",
        )
        .bind(user_id)
        .bind(labels)
        .bind(mime_pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files by type", e)
        })
    }

    /// List non-trashed files the user has created shares for.
    pub async fn list_shared_by(&self, user_id: UserId) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT DISTINCT f.* FROM files f \
             JOIN shared_items s ON s.file_id = f.id \
             WHERE s.user_id = $1 AND f.trashed = FALSE",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shared files", e)
        })
    }

    /// List non-trashed files shared to an email address.
    pub async fn list_shared_with(&self, email: &str) -> AppResult<Vec<File>> {
        sqlx::query_as::<_, File>(
            "SELECT DISTINCT f.* FROM files f \
             JOIN shared_items s ON s.file_id = f.id \
             WHERE LOWER(s.shared_with) = LOWER($1) AND f.trashed = FALSE",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list files shared with user", e)
        })
    }

    /// Point a file record at a new name, directory, or folder.
    pub async fn update_location(&self, id: FileId, location: &FileLocation<'_>) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET folder_id = $2, name = $3, file_path = $4, file_url = $5, \
             updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(location.folder_id)
        .bind(location.name)
        .bind(location.file_path)
        .bind(location.file_url)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Set or clear the trashed flag.
    pub async fn set_trashed(&self, id: FileId, trashed: bool) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET trashed = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(trashed)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Set or clear the locked flag.
    pub async fn set_locked(&self, id: FileId, locked: bool) -> AppResult<File> {
        sqlx::query_as::<_, File>(
            "UPDATE files SET locked = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(locked)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    /// Delete a file record.
    pub async fn delete<'e, E>(&self, id: FileId, executor: E) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete file", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Total size of all files in a folder and its descendants.
    pub async fn total_size_under<'e, E>(&self, folder_id: FolderId, executor: E) -> AppResult<i64>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar::<_, i64>(
            "WITH RECURSIVE tree AS ( \
                 SELECT id FROM folders WHERE id = $1 \
                 UNION ALL \
                 SELECT f.id FROM folders f JOIN tree t ON f.parent_id = t.id \
             ) \
             SELECT COALESCE(SUM(size), 0)::BIGINT FROM files WHERE folder_id IN (SELECT id FROM tree)",
        )
        .bind(folder_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum folder contents", e)
        })
    }
}
