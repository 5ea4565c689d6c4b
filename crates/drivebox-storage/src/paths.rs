//! Mapping from users and folders to directories in the blob store.
//!
//! Every user owns one directory directly under the storage root, named by
//! email. Folder records carry their own absolute path; this module only
//! derives the per-user root, joins validated segments onto a base, and
//! creates the resulting directories.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use drivebox_core::config::storage::StorageConfig;
use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::StorageProvider;

/// Resolves and creates directories for user content.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    previews_dir_name: String,
    provider: Arc<dyn StorageProvider>,
}

impl PathResolver {
    /// Create a resolver over `root`.
    pub fn new(
        root: impl Into<PathBuf>,
        previews_dir_name: impl Into<String>,
        provider: Arc<dyn StorageProvider>,
    ) -> Self {
        Self {
            root: root.into(),
            previews_dir_name: previews_dir_name.into(),
            provider,
        }
    }

    /// Create a resolver for the storage root of the configured mode.
    pub fn from_config(config: &StorageConfig, provider: Arc<dyn StorageProvider>) -> Self {
        Self::new(config.storage_root(), &config.previews_dir_name, provider)
    }

    /// The directory all user trees live under.
    pub fn storage_root(&self) -> &Path {
        &self.root
    }

    /// The per-user root directory. Does not touch the filesystem.
    pub fn user_root(&self, email: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(sanitize_segment(email)?))
    }

    /// Where preview artifacts for a user are written.
    pub fn previews_dir(&self, email: &str) -> AppResult<PathBuf> {
        Ok(self.user_root(email)?.join(&self.previews_dir_name))
    }

    /// Join already-validated segments onto `base` and create every missing
    /// directory along the way. Idempotent.
    pub async fn ensure_dir(&self, base: &Path, segments: &[String]) -> AppResult<PathBuf> {
        let mut dir = base.to_path_buf();
        for segment in segments {
            dir.push(sanitize_segment(segment)?);
        }
        self.provider.create_dir(&dir).await?;
        debug!(dir = %dir.display(), "Ensured directory");
        Ok(dir)
    }

    /// Create the per-user root directory and return it.
    pub async fn ensure_user_root(&self, email: &str) -> AppResult<PathBuf> {
        let root = self.user_root(email)?;
        self.ensure_dir(&root, &[]).await
    }
}

/// Validate a single path component supplied by a client.
///
/// Rejects empty names, `.` and `..`, and anything containing a path
/// separator or NUL. Surrounding whitespace is trimmed.
pub fn sanitize_segment(segment: &str) -> AppResult<&str> {
    let trimmed = segment.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        return Err(AppError::validation(format!("Invalid name: '{segment}'")));
    }
    if trimmed.contains(['/', '\\', '\0']) {
        return Err(AppError::validation(format!(
            "Name must not contain path separators: '{segment}'"
        )));
    }
    Ok(trimmed)
}

/// The directory segments of a client-supplied relative path.
///
/// The last element names the file itself and is discarded. Empty
/// segments (from leading, trailing, or doubled slashes) are skipped.
pub fn directory_segments(relative_path: &str) -> AppResult<Vec<String>> {
    let mut parts: Vec<&str> = relative_path.split('/').collect();
    parts.pop();
    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| sanitize_segment(p).map(str::to_string))
        .collect()
}

/// The bare file name of a client-supplied upload name.
///
/// Browsers may send a full client path; only the final component is kept.
pub fn upload_file_name(original: &str) -> AppResult<String> {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    sanitize_segment(base).map(str::to_string)
}
