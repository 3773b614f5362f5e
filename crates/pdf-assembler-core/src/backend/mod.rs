mod http;
mod traits;
mod types;

pub use http::HttpBackend;
pub use traits::Backend;
pub use types::{
    CreatePdfRequest, CreatePdfResponse, ManifestEntry, PageManifestEntry, PdfInfo, ResultId,
    ResultInfo, UploadResponse,
};

use crate::config::BackendConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create a backend client from configuration
pub fn create_backend(config: &BackendConfig) -> Result<Arc<dyn Backend>> {
    Ok(Arc::new(HttpBackend::new(config)?))
}
