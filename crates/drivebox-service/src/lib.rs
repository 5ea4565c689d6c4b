//! # drivebox-service
//!
//! Business logic service layer for DriveBox. Each service orchestrates
//! repositories and the blob store to implement one group of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod client;
pub mod context;
pub mod file;
pub mod folder;
pub mod quota;
pub mod recorder;
pub mod share;
pub mod upload;

pub use client::ClientInfo;
pub use context::RequestContext;
pub use file::FileService;
pub use folder::FolderService;
pub use quota::QuotaLedger;
pub use recorder::MetadataRecorder;
pub use share::{LinkService, PasswordHasher, ShareService};
pub use upload::{IncomingFile, UploadService, UploadSession};
