//! Route definitions for the DriveBox HTTP API.
//!
//! All routes are mounted under `/api`. Under `/files/`, the second path
//! segment is always the `{key}` parameter (a file id, or the item type of
//! a permanent delete) so that the routes share one parameter name.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and the request logger.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX);

    let api_routes = Router::new()
        .merge(upload_routes().layer(DefaultBodyLimit::max(max_upload)))
        .merge(file_routes())
        .merge(share_routes())
        .merge(folder_routes())
        .merge(storage_routes())
        .merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Multipart upload
fn upload_routes() -> Router<AppState> {
    Router::new().route("/files/upload", post(handlers::upload::upload_files))
}

/// File listing, mutation, deletion, and byte access
fn file_routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(handlers::file::list_files))
        .route(
            "/files/category/{category}",
            get(handlers::file::list_category),
        )
        .route("/files/preview/{id}", get(handlers::file::preview_file))
        .route("/files/{key}", get(handlers::file::get_file))
        .route("/files/{key}/{id}", delete(handlers::file::delete_permanently))
        .route("/files/{key}/rename", put(handlers::file::rename_file))
        .route("/files/{key}/move", put(handlers::file::move_file))
        .route("/files/{key}/copy", post(handlers::file::copy_file))
        .route("/files/{key}/trash", put(handlers::file::move_to_trash))
        .route("/files/{key}/restore", put(handlers::file::restore_file))
        .route("/files/{key}/lock", put(handlers::file::lock_file))
        .route("/files/{key}/unlock", put(handlers::file::unlock_file))
        .route("/files/{key}/download", get(handlers::file::download_file))
        .route("/files/{key}/share-link", get(handlers::file::share_link))
}

/// Share creation and public share access
fn share_routes() -> Router<AppState> {
    Router::new()
        .route("/files/share", post(handlers::share::share_item))
        .route("/files/{key}/copy-link", get(handlers::share::copy_link))
        .route("/files/shared/{token}", get(handlers::share::shared_item))
        .route(
            "/files/check-password",
            post(handlers::share::check_password),
        )
}

/// Folder creation
fn folder_routes() -> Router<AppState> {
    Router::new().route("/folders", post(handlers::folder::create_folder))
}

/// Storage usage
fn storage_routes() -> Router<AppState> {
    Router::new().route("/storage/usage", get(handlers::storage::usage))
}

/// Health check (unauthenticated)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
