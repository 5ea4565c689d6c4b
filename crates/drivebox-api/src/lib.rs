//! # drivebox-api
//!
//! HTTP API layer for DriveBox built on Axum.
//!
//! Provides the REST endpoints, the bearer-token extractor, multipart
//! ingest, middleware (CORS, logging), DTOs, and error mapping.

pub mod app;
pub mod auth;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod ingest;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
