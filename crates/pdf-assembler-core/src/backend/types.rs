//! Wire types exchanged with the processing backend.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Response to `POST /upload`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub filename: String,
    #[serde(default)]
    pub pdf_info: Option<PdfInfo>,
    #[serde(default)]
    pub pages: Option<Vec<PageManifestEntry>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Document-level info returned alongside the page list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfInfo {
    pub page_count: usize,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub filename: Option<String>,
}

/// One rendered page as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageManifestEntry {
    pub page_number: u32,
    pub image_data: String,
    pub width: u32,
    pub height: u32,
}

/// One page of the requested output, in output order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub source_pdf: String,
    pub page_number: u32,
    pub unique_id: String,
    pub rotation: u16,
}

/// Body of `POST /create-pdf`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePdfRequest {
    pub pages: Vec<ManifestEntry>,
    pub filename: String,
}

/// Response to `POST /create-pdf`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePdfResponse {
    #[serde(default)]
    pub result_id: Option<ResultId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Opaque handle for a rendered result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultId(String);

impl ResultId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResultId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Response to `GET /result/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultInfo {
    pub result_id: ResultId,
    pub filename: String,
    pub file_size: u64,
    /// Unix timestamp in seconds
    pub created_at: f64,
    #[serde(default)]
    pub download_url: Option<String>,
}

impl ResultInfo {
    /// Creation time; out-of-range or malformed timestamps read as the epoch.
    pub fn created_at(&self) -> SystemTime {
        Duration::try_from_secs_f64(self.created_at)
            .ok()
            .and_then(|d| UNIX_EPOCH.checked_add(d))
            .unwrap_or(UNIX_EPOCH)
    }

    pub fn display_size(&self) -> String {
        crate::util::format_file_size(self.file_size)
    }
}
