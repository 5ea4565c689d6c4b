//! Application builder: wires repositories, services, and the router into
//! an Axum app, and runs it.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use drivebox_core::config::AppConfig;
use drivebox_core::error::AppError;
use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::StorageProvider;
use drivebox_database::DatabasePool;
use drivebox_database::migration::run_migrations;
use drivebox_database::repositories::{
    ActivityRepository, FileRepository, FolderRepository, ShareRepository,
    StorageSnapshotRepository, UserRepository,
};
use drivebox_service::{
    FileService, FolderService, LinkService, MetadataRecorder, QuotaLedger, ShareService,
    UploadService,
};
use drivebox_storage::{FileMaterializer, LocalStorageProvider, PathResolver, PublicUrlBuilder};

use crate::auth::TokenVerifier;
use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Wire every repository and service on top of an open pool.
pub async fn build_state(config: AppConfig, db_pool: PgPool) -> AppResult<AppState> {
    let storage_root = config.storage.storage_root();
    info!(root = %storage_root.display(), mode = ?config.storage.mode, "Initializing storage");
    let provider: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(storage_root).await?);

    let user_repo = UserRepository::new(db_pool.clone());
    let folder_repo = FolderRepository::new(db_pool.clone());
    let file_repo = FileRepository::new(db_pool.clone());
    let snapshot_repo = StorageSnapshotRepository::new(db_pool.clone());
    let activity_repo = ActivityRepository::new(db_pool.clone());
    let share_repo = ShareRepository::new(db_pool.clone());

    let resolver = Arc::new(PathResolver::from_config(
        &config.storage,
        Arc::clone(&provider),
    ));
    let urls = PublicUrlBuilder::new(
        &config.storage.public_app_url,
        &config.storage.public_storage_path,
    );

    let recorder = Arc::new(MetadataRecorder::new(
        file_repo.clone(),
        folder_repo.clone(),
        activity_repo,
    ));
    let ledger = Arc::new(QuotaLedger::new(user_repo.clone(), snapshot_repo));

    let folder_service = Arc::new(FolderService::new(
        user_repo,
        folder_repo.clone(),
        resolver,
        Arc::clone(&recorder),
    ));
    let upload_service = Arc::new(UploadService::new(
        db_pool.clone(),
        Arc::clone(&folder_service),
        FileMaterializer::new(Arc::clone(&provider)),
        Arc::clone(&ledger),
        Arc::clone(&recorder),
        urls.clone(),
    ));
    let file_service = Arc::new(FileService::new(
        db_pool.clone(),
        file_repo.clone(),
        folder_repo.clone(),
        Arc::clone(&folder_service),
        provider,
        ledger,
        Arc::clone(&recorder),
        urls,
        config.storage.public_app_url.clone(),
    ));
    let share_service = Arc::new(ShareService::new(
        share_repo,
        file_repo,
        folder_repo,
        LinkService::from_config(&config.share),
        recorder,
    ));

    Ok(AppState {
        tokens: Arc::new(TokenVerifier::new(&config.auth)),
        config: Arc::new(config),
        db_pool,
        upload_service,
        file_service,
        folder_service,
        share_service,
    })
}

/// Runs the DriveBox server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    info!("Starting DriveBox v{}", env!("CARGO_PKG_VERSION"));

    let db_pool = DatabasePool::connect(&config.database).await?.into_pool();
    if config.database.migrate_on_start {
        run_migrations(&db_pool).await?;
    }

    let addr = config.server.bind_address();
    let state = build_state(config, db_pool.clone()).await?;
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    info!("DriveBox server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    db_pool.close().await;
    info!("DriveBox server shut down gracefully");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received, starting graceful shutdown...");
}
