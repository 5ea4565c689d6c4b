//! Core traits defined in `drivebox-core` and implemented by other crates.

pub mod storage;

pub use storage::{ByteStream, StorageProvider};
