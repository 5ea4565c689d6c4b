//! Blob storage configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Which storage root is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Serve user trees from `production_root`.
    Production,
    /// Serve user trees from `development_root` (or `./public/File Manager`).
    #[default]
    Development,
}

/// Top-level storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Active storage mode.
    #[serde(default)]
    pub mode: StorageMode,
    /// Storage root used in production mode.
    #[serde(default = "default_production_root")]
    pub production_root: String,
    /// Storage root used in development mode. When unset, resolves to
    /// `public/File Manager` under the working directory.
    #[serde(default)]
    pub development_root: Option<String>,
    /// Public origin of the application, used to build file URLs.
    #[serde(default = "default_public_app_url")]
    pub public_app_url: String,
    /// Path under `public_app_url` where user trees are served.
    #[serde(default = "default_public_storage_path")]
    pub public_storage_path: String,
    /// Name of the preview artifact directory inside the storage root.
    #[serde(default = "default_previews_dir")]
    pub previews_dir_name: String,
    /// Maximum request body size for uploads, in bytes (default 5 GB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Quota assigned to users created without an explicit limit.
    #[serde(default = "default_quota")]
    pub default_quota_bytes: i64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            mode: StorageMode::default(),
            production_root: default_production_root(),
            development_root: None,
            public_app_url: default_public_app_url(),
            public_storage_path: default_public_storage_path(),
            previews_dir_name: default_previews_dir(),
            max_upload_size_bytes: default_max_upload(),
            default_quota_bytes: default_quota(),
        }
    }
}

impl StorageConfig {
    /// The directory all per-user trees live under for the active mode.
    pub fn storage_root(&self) -> PathBuf {
        match self.mode {
            StorageMode::Production => PathBuf::from(&self.production_root),
            StorageMode::Development => match &self.development_root {
                Some(root) => PathBuf::from(root),
                None => std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("public")
                    .join("File Manager"),
            },
        }
    }
}

fn default_production_root() -> String {
    "/var/www/cefmdrive/storage".to_string()
}

fn default_public_app_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_public_storage_path() -> String {
    "/cefmdrive/storage".to_string()
}

fn default_previews_dir() -> String {
    "previews".to_string()
}

fn default_max_upload() -> u64 {
    5_368_709_120 // 5 GB
}

fn default_quota() -> i64 {
    10_737_418_240 // 10 GB
}
