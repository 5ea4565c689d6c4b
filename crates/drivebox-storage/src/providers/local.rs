//! Local filesystem storage provider.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::stream::StreamExt;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::debug;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::{ByteStream, StorageProvider};

/// Local filesystem storage provider.
///
/// Accepts absolute paths, but only those inside `root`.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Root directory for all stored files.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The directory this provider manages.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that a path is absolute, free of `..`, and inside the root.
    fn contain<'p>(&self, path: &'p Path) -> AppResult<&'p Path> {
        let escapes = path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::CurDir));
        if !path.is_absolute() || escapes || !path.starts_with(&self.root) {
            return Err(AppError::validation(format!(
                "Path is outside the storage root: {}",
                path.display()
            )));
        }
        Ok(path)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

fn not_found_or_storage(e: std::io::Error, what: &str, path: &Path) -> AppError {
    if e.kind() == std::io::ErrorKind::NotFound {
        AppError::not_found(format!("File not found: {}", path.display()))
    } else {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to {what}: {}", path.display()),
            e,
        )
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn read(&self, path: &Path) -> AppResult<ByteStream<'static>> {
        let path = self.contain(path)?;
        let file = fs::File::open(path)
            .await
            .map_err(|e| not_found_or_storage(e, "open file", path))?;

        let stream = ReaderStream::new(file);
        Ok(Box::pin(stream))
    }

    async fn write_stream<'a>(&self, path: &Path, mut stream: ByteStream<'a>) -> AppResult<u64> {
        let path = self.contain(path)?;
        self.ensure_parent(path).await?;

        let mut file = fs::File::create(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create file: {}", path.display()),
                e,
            )
        })?;

        let mut total_bytes = 0u64;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            total_bytes += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to write chunk", e)
            })?;
        }

        file.flush()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to flush file", e))?;
        file.sync_all()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Storage, "Failed to sync file", e))?;

        debug!(path = %path.display(), bytes = total_bytes, "Wrote file from stream");
        Ok(total_bytes)
    }

    async fn delete(&self, path: &Path) -> AppResult<()> {
        let path = self.contain(path)?;
        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete file: {}", path.display()),
                e,
            )),
        }
    }

    async fn delete_dir(&self, path: &Path) -> AppResult<()> {
        let path = self.contain(path)?;
        if path == self.root {
            return Err(AppError::validation("Refusing to delete the storage root"));
        }
        match fs::remove_dir_all(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete directory: {}", path.display()),
                e,
            )),
        }
    }

    async fn copy(&self, from: &Path, to: &Path) -> AppResult<u64> {
        let from = self.contain(from)?;
        let to = self.contain(to)?;
        self.ensure_parent(to).await?;

        fs::copy(from, to)
            .await
            .map_err(|e| not_found_or_storage(e, "copy file", from))
    }

    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()> {
        let from = self.contain(from)?;
        let to = self.contain(to)?;
        self.ensure_parent(to).await?;

        fs::rename(from, to)
            .await
            .map_err(|e| not_found_or_storage(e, "move file", from))
    }

    async fn exists(&self, path: &Path) -> AppResult<bool> {
        let path = self.contain(path)?;
        fs::try_exists(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to check path: {}", path.display()),
                e,
            )
        })
    }

    async fn size(&self, path: &Path) -> AppResult<u64> {
        let path = self.contain(path)?;
        fs::metadata(path)
            .await
            .map(|m| m.len())
            .map_err(|e| not_found_or_storage(e, "stat file", path))
    }

    async fn create_dir(&self, path: &Path) -> AppResult<()> {
        let path = self.contain(path)?;
        fs::create_dir_all(path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create directory: {}", path.display()),
                e,
            )
        })
    }
}
