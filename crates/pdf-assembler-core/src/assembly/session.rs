//! UI-facing session state around the assembly store.
//!
//! Owns what a front end would otherwise keep as loose globals: the current
//! view mode, the drag in progress, one request slot per network operation
//! kind, and the most recent error.

use std::fmt;
use tracing::{debug, warn};

use super::drag::{DragEvent, DragOutcome, DragState};
use super::page::{DocumentKey, PageId, Rotation};
use super::store::AssemblyStore;
use crate::backend::ResultId;
use crate::error::{Error, Result};
use crate::ingest::IngestedDocument;

/// Which projection of the store is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Flat page sequence
    #[default]
    Pages,
    /// Pages grouped by source document
    Documents,
}

/// Network operations that must not overlap with themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Upload,
    Submission,
    Retrieval,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Upload => "Upload",
            Self::Submission => "Submission",
            Self::Retrieval => "Retrieval",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    InFlight,
}

#[derive(Debug, Default)]
pub struct AssemblySession {
    store: AssemblyStore,
    view_mode: ViewMode,
    drag: DragState,
    upload: RequestState,
    submission: RequestState,
    retrieval: RequestState,
    last_error: Option<String>,
}

impl AssemblySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn store(&self) -> &AssemblyStore {
        &self.store
    }

    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    pub const fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // Request slots
    // =========================================================================

    const fn slot(&mut self, kind: RequestKind) -> &mut RequestState {
        match kind {
            RequestKind::Upload => &mut self.upload,
            RequestKind::Submission => &mut self.submission,
            RequestKind::Retrieval => &mut self.retrieval,
        }
    }

    pub const fn request_state(&self, kind: RequestKind) -> RequestState {
        match kind {
            RequestKind::Upload => self.upload,
            RequestKind::Submission => self.submission,
            RequestKind::Retrieval => self.retrieval,
        }
    }

    pub const fn is_in_flight(&self, kind: RequestKind) -> bool {
        matches!(self.request_state(kind), RequestState::InFlight)
    }

    /// Claim the slot for `kind`, failing if a request is already pending.
    pub fn begin(&mut self, kind: RequestKind) -> Result<()> {
        let slot = self.slot(kind);
        if *slot == RequestState::InFlight {
            warn!("Rejected duplicate {}", kind);
            return Err(Error::RequestInFlight(kind));
        }
        *slot = RequestState::InFlight;
        self.last_error = None;
        debug!("{} started", kind);
        Ok(())
    }

    pub fn finish(&mut self, kind: RequestKind) {
        *self.slot(kind) = RequestState::Idle;
        debug!("{} finished", kind);
    }

    /// Keep the latest outcome: an error replaces the previous one,
    /// a success clears it.
    pub fn record<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.last_error = None;
                Some(value)
            }
            Err(e) => {
                warn!("{}", e);
                self.last_error = Some(e.to_string());
                None
            }
        }
    }

    /// Finish an upload and stage its pages on success.
    pub fn complete_upload(&mut self, result: Result<IngestedDocument>) -> Option<DocumentKey> {
        self.finish(RequestKind::Upload);
        let ingested = self.record(result)?;
        Some(self.store.append(ingested))
    }

    /// Finish a submission. The store is left as-is so the user can resubmit.
    pub fn complete_submission(&mut self, result: Result<ResultId>) -> Option<ResultId> {
        self.finish(RequestKind::Submission);
        self.record(result)
    }

    // =========================================================================
    // Edits
    // =========================================================================

    pub fn drag(&mut self, event: DragEvent) -> DragOutcome {
        self.drag.handle(event, &mut self.store)
    }

    pub fn rotate_page(&mut self, id: &PageId) -> Option<Rotation> {
        self.store.rotate_page(id)
    }

    pub fn remove_page(&mut self, id: &PageId) -> bool {
        self.store.remove_page(id)
    }

    pub fn remove_document(&mut self, name: &str) -> bool {
        self.last_error = None;
        self.store.remove_document(name)
    }

    /// Drop everything staged. View mode and pending requests survive.
    pub fn clear_all(&mut self) {
        self.store.clear();
        self.drag = DragState::Idle;
        self.last_error = None;
    }
}
