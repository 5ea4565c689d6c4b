//! Per-request upload state.
//!
//! Multipart parts are handed to the session in arrival order. Field parts
//! update the session and only affect file parts that come after them.

use tracing::debug;

use drivebox_core::error::{AppError, ErrorKind};
use drivebox_core::result::AppResult;
use drivebox_core::types::FolderId;
use drivebox_entity::file::File;
use drivebox_entity::folder::Folder;
use drivebox_entity::user::User;
use drivebox_storage::paths::directory_segments;

use crate::quota::QUOTA_EXCEEDED_MESSAGE;

/// Form field naming the destination folder.
pub const FOLDER_ID_FIELD: &str = "folderId";
/// Form field carrying the client-side relative path of the next file.
pub const RELATIVE_PATH_FIELD: &str = "relativePath";

const UPLOAD_FAILED_MESSAGE: &str = "Error uploading files";

/// Accumulates field values and per-file outcomes for one upload request.
#[derive(Debug)]
pub struct UploadSession {
    user: User,
    folder_id: Option<String>,
    relative_path: Option<String>,
    /// Base folder resolved for the folder id it was resolved from.
    base: Option<(Option<FolderId>, Folder)>,
    outcomes: Vec<AppResult<File>>,
}

impl UploadSession {
    pub fn new(user: User) -> Self {
        Self {
            user,
            folder_id: None,
            relative_path: None,
            base: None,
            outcomes: Vec::new(),
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Apply a non-file form field.
    pub fn apply_field(&mut self, name: &str, value: String) {
        match name {
            FOLDER_ID_FIELD => self.folder_id = Some(value),
            RELATIVE_PATH_FIELD => self.relative_path = Some(value),
            other => debug!(field = other, "Ignoring unknown upload field"),
        }
    }

    /// The requested destination folder. Empty or malformed ids count as
    /// "none requested".
    pub fn requested_folder_id(&self) -> Option<FolderId> {
        let raw = self.folder_id.as_deref()?.trim();
        if raw.is_empty() || raw == "null" || raw == "undefined" {
            return None;
        }
        match raw.parse() {
            Ok(id) => Some(id),
            Err(_) => {
                debug!(folder_id = raw, "Ignoring malformed folder id");
                None
            }
        }
    }

    /// Directory segments from the current relative path.
    pub fn directory_segments(&self) -> AppResult<Vec<String>> {
        match self.relative_path.as_deref() {
            Some(path) => directory_segments(path),
            None => Ok(Vec::new()),
        }
    }

    /// The base folder resolved earlier in this request, if the requested
    /// folder id has not changed since.
    pub fn cached_base(&self) -> Option<&Folder> {
        match &self.base {
            Some((requested, folder)) if *requested == self.requested_folder_id() => Some(folder),
            _ => None,
        }
    }

    pub fn cache_base(&mut self, folder: Folder) {
        self.base = Some((self.requested_folder_id(), folder));
    }

    /// Record the outcome of one file part.
    pub fn record(&mut self, outcome: AppResult<File>) {
        self.outcomes.push(outcome);
    }

    /// Whether any file part has failed so far.
    pub fn has_failure(&self) -> bool {
        self.outcomes.iter().any(Result::is_err)
    }

    /// Number of file parts seen so far.
    pub fn file_count(&self) -> usize {
        self.outcomes.len()
    }

    /// Collapse the outcomes into the request result.
    ///
    /// The first failure in arrival order decides the error: quota and
    /// input errors keep their client-facing kind, anything else becomes a
    /// generic server error. Files stored before or after it stay stored.
    pub fn finish(self) -> AppResult<Vec<File>> {
        if self.outcomes.is_empty() {
            return Err(AppError::validation("No files uploaded"));
        }

        let mut files = Vec::with_capacity(self.outcomes.len());
        for outcome in self.outcomes {
            match outcome {
                Ok(file) => files.push(file),
                Err(e) if e.is(ErrorKind::QuotaExceeded) => {
                    return Err(AppError::quota_exceeded(QUOTA_EXCEEDED_MESSAGE));
                }
                Err(e) if e.is(ErrorKind::Validation) => {
                    return Err(AppError::validation(e.message));
                }
                Err(_) => return Err(AppError::new(ErrorKind::Internal, UPLOAD_FAILED_MESSAGE)),
            }
        }
        Ok(files)
    }
}
