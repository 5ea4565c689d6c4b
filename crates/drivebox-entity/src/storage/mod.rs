//! Storage accounting entities.

pub mod quota;
pub mod snapshot;

pub use quota::QuotaFigures;
pub use snapshot::{CreateStorageSnapshot, StorageSnapshot};
