//! Multipart ingest: turns an upload body into field and file events in
//! wire order.
//!
//! File parts are handed over as byte streams borrowed from the body, so a
//! file must be fully consumed (or dropped) before the next part is read.

use futures::TryStreamExt;

use axum::extract::Multipart;

use drivebox_core::error::AppError;
use drivebox_service::IncomingFile;

/// One part of a multipart body.
#[derive(Debug)]
pub enum IngestPart<'a> {
    /// A plain form field.
    Field { name: String, value: String },
    /// A file part with its streaming body.
    File(IncomingFile<'a>),
}

/// Sequential reader over a multipart upload body.
pub struct MultipartIngest {
    multipart: Multipart,
}

impl MultipartIngest {
    pub fn new(multipart: Multipart) -> Self {
        Self { multipart }
    }

    /// The next part, or `None` once the body is exhausted.
    pub async fn next_part(&mut self) -> Result<Option<IngestPart<'_>>, AppError> {
        let Some(field) = self
            .multipart
            .next_field()
            .await
            .map_err(|e| AppError::validation(format!("Malformed upload body: {e}")))?
        else {
            return Ok(None);
        };

        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field.content_type().map(str::to_string);
                let stream = Box::pin(field.map_err(std::io::Error::other));
                Ok(Some(IngestPart::File(IncomingFile {
                    field_name: name,
                    file_name,
                    content_type,
                    stream,
                })))
            }
            None => {
                let value = field.text().await.map_err(|e| {
                    AppError::validation(format!("Failed to read field '{name}': {e}"))
                })?;
                Ok(Some(IngestPart::Field { name, value }))
            }
        }
    }
}
