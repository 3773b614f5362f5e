//! Ingestion: send one file to the backend and get its page manifest back.

use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{Backend, PageManifestEntry};
use crate::error::{Error, Result};

/// Media type every upload must declare
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file selected for upload.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    /// Declared media type (not sniffed from the content)
    pub media_type: String,
    pub bytes: Bytes,
}

impl Upload {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, declaring its media type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(filename, media_type, bytes))
    }

    /// Local checks run before any network call.
    pub fn validate(&self) -> Result<()> {
        if self.filename.is_empty() && self.bytes.is_empty() {
            return Err(Error::NoFileSelected);
        }
        let essence = self
            .media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim();
        if !essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE) {
            return Err(Error::InvalidMediaType {
                found: self.media_type.clone(),
            });
        }
        Ok(())
    }
}

/// A successfully processed upload, ready to be staged in the store.
#[derive(Debug, Clone)]
pub struct IngestedDocument {
    pub document_name: String,
    pub metadata: serde_json::Value,
    pub page_count: usize,
    pub pages: Vec<PageManifestEntry>,
}

pub struct Ingestor {
    backend: Arc<dyn Backend>,
}

impl Ingestor {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Validate, upload and unpack one file.
    ///
    /// Never touches the assembly store; the caller appends on success.
    pub async fn ingest(&self, upload: &Upload) -> Result<IngestedDocument> {
        upload.validate()?;

        let response = self.backend.upload(upload).await?;

        let (Some(pdf_info), Some(pages)) = (response.pdf_info, response.pages) else {
            let reason = response
                .error
                .unwrap_or_else(|| "response did not include page data".to_string());
            warn!("Upload of {} returned no pages: {}", response.filename, reason);
            return Err(Error::ProcessingFailed(reason));
        };

        info!("Ingested {} ({} pages)", response.filename, pages.len());

        Ok(IngestedDocument {
            document_name: response.filename,
            metadata: pdf_info.metadata,
            page_count: pdf_info.page_count,
            pages,
        })
    }
}
