//! Storage provider trait for the blob store that backs user files.

use std::path::Path;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream used both for incoming upload bodies and outgoing
/// downloads. The lifetime lets upload streams borrow the request body.
pub type ByteStream<'a> = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send + 'a>>;

/// Trait for file storage backends.
///
/// Paths are absolute; file and folder records store the on-disk location
/// directly, so providers must refuse paths outside the tree they manage.
/// The trait is defined here in `drivebox-core` and implemented in
/// `drivebox-storage`.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Open a file for streaming reads.
    async fn read(&self, path: &Path) -> AppResult<ByteStream<'static>>;

    /// Write a byte stream to a file, creating or truncating it, and return
    /// the number of bytes flushed.
    async fn write_stream<'a>(&self, path: &Path, stream: ByteStream<'a>) -> AppResult<u64>;

    /// Delete a file.
    async fn delete(&self, path: &Path) -> AppResult<()>;

    /// Delete a directory and all its contents recursively.
    async fn delete_dir(&self, path: &Path) -> AppResult<()>;

    /// Copy a file, returning the number of bytes copied.
    async fn copy(&self, from: &Path, to: &Path) -> AppResult<u64>;

    /// Move (rename) a file.
    async fn rename(&self, from: &Path, to: &Path) -> AppResult<()>;

    /// Check whether a file or directory exists.
    async fn exists(&self, path: &Path) -> AppResult<bool>;

    /// Size of a file in bytes.
    async fn size(&self, path: &Path) -> AppResult<u64>;

    /// Create a directory (and any missing parents).
    async fn create_dir(&self, path: &Path) -> AppResult<()>;
}
