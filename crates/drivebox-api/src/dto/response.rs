//! Response DTOs.

use serde::{Deserialize, Serialize};

use drivebox_entity::file::File;

/// Successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub files: Vec<File>,
}

/// A file after it was moved to another folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    pub message: String,
    pub file: File,
}

/// Restore confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestoreResponse {
    pub success: bool,
    pub file: File,
}

/// Permanent deletion confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: String,
}

/// A single link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkResponse {
    pub link: String,
}

/// Share creation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareResponse {
    pub message: String,
    pub url: String,
}

/// Reusable share URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyLinkResponse {
    pub url: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}
