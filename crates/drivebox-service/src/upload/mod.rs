//! Upload pipeline: the per-request session and the per-file orchestrator.

pub mod service;
pub mod session;

pub use service::{IncomingFile, UploadService};
pub use session::UploadSession;
