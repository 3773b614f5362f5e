//! Result retrieval: metadata first, then the artifact for preview.
//!
//! A metadata failure fails the whole fetch. An artifact failure only
//! degrades the preview; the metadata is still returned.

mod preview;

pub use preview::{PreviewHandle, PreviewRegistry};

use bytes::Bytes;
use std::sync::Arc;
use tracing::{info, warn};

use crate::backend::{Backend, ResultId, ResultInfo};
use crate::error::Result;

/// State of the inline preview area.
#[derive(Debug)]
pub enum PreviewState {
    Loading,
    Ready(PreviewHandle),
    Failed(String),
}

impl PreviewState {
    pub const fn handle(&self) -> Option<&PreviewHandle> {
        match self {
            Self::Ready(handle) => Some(handle),
            _ => None,
        }
    }
}

/// What a result page shows: metadata plus the preview.
///
/// Dropping the view releases its preview handle.
#[derive(Debug)]
pub struct ResultView {
    pub info: ResultInfo,
    preview: PreviewState,
}

impl ResultView {
    pub const fn new(info: ResultInfo) -> Self {
        Self {
            info,
            preview: PreviewState::Loading,
        }
    }

    pub const fn preview(&self) -> &PreviewState {
        &self.preview
    }

    /// Replace the preview; the previous handle, if any, is released here.
    pub fn set_preview(&mut self, preview: PreviewState) {
        self.preview = preview;
    }
}

pub struct Retriever {
    backend: Arc<dyn Backend>,
    registry: PreviewRegistry,
}

impl Retriever {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            registry: PreviewRegistry::new(),
        }
    }

    pub const fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }

    /// Fetch metadata, then the artifact for preview.
    pub async fn fetch_result(&self, result_id: &ResultId) -> Result<ResultView> {
        let info = self.backend.result_info(result_id).await?;
        info!(
            "Result {}: {} ({})",
            result_id,
            info.filename,
            info.display_size()
        );

        let mut view = ResultView::new(info);
        view.set_preview(self.load_preview(result_id).await);
        Ok(view)
    }

    /// Re-fetch the artifact for an existing view.
    pub async fn refresh_preview(&self, view: &mut ResultView) {
        view.set_preview(PreviewState::Loading);
        let result_id = view.info.result_id.clone();
        view.set_preview(self.load_preview(&result_id).await);
    }

    async fn load_preview(&self, result_id: &ResultId) -> PreviewState {
        let bytes = match self.backend.download(result_id).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Preview download for {} failed: {}", result_id, e);
                return PreviewState::Failed(e.to_string());
            }
        };

        let registry = self.registry.clone();
        let label = result_id.to_string();
        let acquired =
            tokio::task::spawn_blocking(move || registry.acquire(&label, &bytes)).await;

        match acquired {
            Ok(Ok(handle)) => PreviewState::Ready(handle),
            Ok(Err(e)) => {
                warn!("Failed to store preview for {}: {}", result_id, e);
                PreviewState::Failed(format!("Failed to store preview: {e}"))
            }
            Err(e) => PreviewState::Failed(format!("Preview task failed: {e}")),
        }
    }

    /// Fetch the artifact bytes for saving.
    pub async fn download(&self, result_id: &ResultId) -> Result<Bytes> {
        self.backend.download(result_id).await
    }
}
