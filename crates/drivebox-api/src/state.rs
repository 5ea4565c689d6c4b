//! Shared application state passed to all handlers via Axum's `State`.

use std::sync::Arc;

use sqlx::PgPool;

use drivebox_core::config::AppConfig;
use drivebox_service::{FileService, FolderService, ShareService, UploadService};

use crate::auth::TokenVerifier;

/// Application state shared across all request handlers.
///
/// Cheap to clone: everything is behind an `Arc` or is a pool handle.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Full application configuration.
    pub config: Arc<AppConfig>,
    /// Database connection pool.
    pub db_pool: PgPool,
    /// Access token verification.
    pub tokens: Arc<TokenVerifier>,

    pub upload_service: Arc<UploadService>,
    pub file_service: Arc<FileService>,
    pub folder_service: Arc<FolderService>,
    pub share_service: Arc<ShareService>,
}
