//! Turning upload streams into files on disk.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use drivebox_core::result::AppResult;
use drivebox_core::traits::storage::{ByteStream, StorageProvider};

/// Writes byte streams to destination paths and reports the stored size.
#[derive(Debug, Clone)]
pub struct FileMaterializer {
    provider: Arc<dyn StorageProvider>,
}

impl FileMaterializer {
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self { provider }
    }

    /// Write `stream` to `dest`, creating or truncating it.
    ///
    /// Returns the size of the file on disk once the stream has been fully
    /// flushed. On a read or write failure nothing is returned and any
    /// partial file stays where it is; see [`FileMaterializer::discard`].
    pub async fn materialize(&self, dest: &Path, stream: ByteStream<'_>) -> AppResult<u64> {
        let written = self.provider.write_stream(dest, stream).await?;
        let size = self.provider.size(dest).await?;
        if size != written {
            warn!(
                path = %dest.display(),
                written,
                size,
                "Stored size differs from streamed byte count"
            );
        }
        debug!(path = %dest.display(), size, "Materialized file");
        Ok(size)
    }

    /// Remove a file that must not be kept. Failures are logged only.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = self.provider.delete(path).await {
            warn!(path = %path.display(), error = %e, "Failed to remove discarded file");
        }
    }
}
