//! PDF Assembler Core Library
//!
//! Client-side state and services for building a new PDF out of pages
//! taken from several uploaded PDFs:
//! - Assembly store with page-level and document-level reordering
//! - Rotation annotations, removal, and grouped/flat projections
//! - Drag events and per-kind request tracking for a UI session
//! - Ingestion, submission and result retrieval against the backend

pub mod assembly;
pub mod backend;
pub mod config;
pub mod error;
pub mod ingest;
pub mod retrieval;
pub mod submit;
pub mod util;

pub use assembly::{
    AssemblySession, AssemblyStore, AssemblyView, Document, DocumentGroup, DocumentKey,
    DragEvent, DragOutcome, DragState, DragSubject, DropTarget, Page, PageId, RequestKind,
    RequestState, Rotation, ViewMode,
};
pub use backend::{Backend, CreatePdfRequest, HttpBackend, ManifestEntry, ResultId, ResultInfo, create_backend};
pub use config::{AppConfig, BackendConfig, DEFAULT_OUTPUT_FILENAME};
pub use error::{Error, Result};
pub use ingest::{IngestedDocument, Ingestor, Upload};
pub use retrieval::{PreviewHandle, PreviewRegistry, PreviewState, ResultView, Retriever};
pub use submit::Submitter;
pub use util::format_file_size;

use std::sync::Arc;
use tracing::debug;

/// High-level client that wires the services to one backend and drives
/// an [`AssemblySession`] through them.
///
/// These methods hold the session for the length of the request. A UI that
/// must keep editing while a request is pending should call
/// [`AssemblySession::begin`], await the service directly, then hand the
/// result back with `complete_*`.
pub struct PdfAssembler {
    ingestor: Ingestor,
    submitter: Submitter,
    retriever: Retriever,
    config: AppConfig,
}

impl PdfAssembler {
    /// Create an assembler talking HTTP to the configured backend
    pub fn new(config: AppConfig) -> Result<Self> {
        let backend = create_backend(&config.backend)?;
        Ok(Self::with_backend(backend, config))
    }

    /// Create with a custom backend
    pub fn with_backend(backend: Arc<dyn Backend>, config: AppConfig) -> Self {
        Self {
            ingestor: Ingestor::new(Arc::clone(&backend)),
            submitter: Submitter::new(Arc::clone(&backend)),
            retriever: Retriever::new(backend),
            config,
        }
    }

    pub const fn config(&self) -> &AppConfig {
        &self.config
    }

    pub const fn ingestor(&self) -> &Ingestor {
        &self.ingestor
    }

    pub const fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    pub const fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Upload one file and stage it. Errors end up in the session's error slot.
    pub async fn upload(&self, session: &mut AssemblySession, upload: &Upload) -> Option<DocumentKey> {
        let claimed = session.begin(RequestKind::Upload);
        session.record(claimed)?;

        let result = self.ingestor.ingest(upload).await;
        session.complete_upload(result)
    }

    /// Submit the session's current order. An empty filename uses the configured default.
    pub async fn submit(&self, session: &mut AssemblySession, filename: &str) -> Option<ResultId> {
        let filename = if filename.trim().is_empty() {
            self.config.output_filename.as_str()
        } else {
            filename
        };

        let prepared = submit::prepare(session.store(), filename);
        let request = session.record(prepared)?;

        let claimed = session.begin(RequestKind::Submission);
        session.record(claimed)?;

        debug!("Submitting {} pages", request.pages.len());
        let result = self.submitter.submit(&request).await;
        session.complete_submission(result)
    }

    /// Fetch the result view for a handle.
    pub async fn fetch_result(
        &self,
        session: &mut AssemblySession,
        result_id: &ResultId,
    ) -> Option<ResultView> {
        let claimed = session.begin(RequestKind::Retrieval);
        session.record(claimed)?;

        let result = self.retriever.fetch_result(result_id).await;
        session.finish(RequestKind::Retrieval);
        session.record(result)
    }
}
