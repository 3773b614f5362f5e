use async_trait::async_trait;
use bytes::Bytes;

use super::types::{CreatePdfRequest, CreatePdfResponse, ResultId, ResultInfo, UploadResponse};
use crate::error::Result;
use crate::ingest::Upload;

/// The remote processing service.
///
/// One method per endpoint; implementations do not retry, since the
/// service does not deduplicate repeated submissions.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /upload` with the file as the `file` multipart field
    async fn upload(&self, upload: &Upload) -> Result<UploadResponse>;

    /// `POST /create-pdf`
    async fn create_pdf(&self, request: &CreatePdfRequest) -> Result<CreatePdfResponse>;

    /// `GET /result/{id}`
    async fn result_info(&self, result_id: &ResultId) -> Result<ResultInfo>;

    /// `GET /download/{id}`
    async fn download(&self, result_id: &ResultId) -> Result<Bytes>;
}
