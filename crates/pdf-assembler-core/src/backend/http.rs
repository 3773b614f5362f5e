use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, Method, RequestBuilder, Response, multipart};
use tracing::{debug, warn};

use super::traits::Backend;
use super::types::{CreatePdfRequest, CreatePdfResponse, ResultId, ResultInfo, UploadResponse};
use crate::config::{API_KEY_HEADER, BackendConfig};
use crate::error::{Error, Result};
use crate::ingest::Upload;

/// HTTP client for the processing backend (or the gateway in front of it).
pub struct HttpBackend {
    client: Client,
    /// Base URL, e.g. "http://localhost:3000/api/proxy"
    pub api_base: String,
    /// Sent as `X-API-Key` when talking to the backend directly
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Misconfigured(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.api_base, path.trim_start_matches('/'));
        debug!("{} {}", method, url);

        let req = self.client.request(method, url);
        match self.api_key {
            Some(ref key) => req.header(API_KEY_HEADER, key),
            None => req,
        }
    }

    /// Pass success responses through, turn anything else into `Error::Status`.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!("Backend error: {} - {}", status, body);
        Err(Error::Status {
            status: status.as_u16(),
            message: error_message(status.as_u16(), &body),
        })
    }
}

/// Pull a human-readable message out of an error body.
///
/// Looks for `detail` (backend) then `error` (gateway); falls back to a
/// status-derived message.
pub(crate) fn error_message(status: u16, body: &str) -> String {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = parsed.as_ref().and_then(|v| {
        ["detail", "error"]
            .iter()
            .find_map(|key| v.get(key).filter(|f| !f.is_null()))
    });

    match field {
        Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
        Some(other) => other.to_string(),
        None => format!("request failed with status {status}"),
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload(&self, upload: &Upload) -> Result<UploadResponse> {
        let part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.filename.clone())
            .mime_str(&upload.media_type)
            .map_err(|_| Error::InvalidMediaType {
                found: upload.media_type.clone(),
            })?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, "upload")
            .multipart(form)
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<UploadResponse>().await?)
    }

    async fn create_pdf(&self, request: &CreatePdfRequest) -> Result<CreatePdfResponse> {
        let response = self
            .request(Method::POST, "create-pdf")
            .json(request)
            .send()
            .await?;

        Ok(Self::check(response).await?.json::<CreatePdfResponse>().await?)
    }

    async fn result_info(&self, result_id: &ResultId) -> Result<ResultInfo> {
        let path = format!("result/{}", urlencoding::encode(result_id.as_str()));
        let response = self.request(Method::GET, &path).send().await?;

        Ok(Self::check(response).await?.json::<ResultInfo>().await?)
    }

    async fn download(&self, result_id: &ResultId) -> Result<Bytes> {
        let path = format!("download/{}", urlencoding::encode(result_id.as_str()));
        let response = self.request(Method::GET, &path).send().await?;

        Ok(Self::check(response).await?.bytes().await?)
    }
}
