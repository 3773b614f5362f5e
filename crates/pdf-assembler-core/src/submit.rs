//! Submission: turn the current page order into a render request.

use std::sync::Arc;
use tracing::info;

use crate::assembly::AssemblyStore;
use crate::backend::{Backend, CreatePdfRequest, ResultId};
use crate::config::DEFAULT_OUTPUT_FILENAME;
use crate::error::{Error, Result};

/// Build the request from a snapshot of the store.
///
/// Fails locally on an empty assembly. A blank filename falls back to
/// the default output name.
pub fn prepare(store: &AssemblyStore, filename: &str) -> Result<CreatePdfRequest> {
    if store.pages().is_empty() {
        return Err(Error::EmptySubmission);
    }

    let filename = match filename.trim() {
        "" => DEFAULT_OUTPUT_FILENAME.to_string(),
        name => name.to_string(),
    };

    Ok(CreatePdfRequest {
        pages: store.manifest(),
        filename,
    })
}

pub struct Submitter {
    backend: Arc<dyn Backend>,
}

impl Submitter {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Send a prepared request; returns the handle for retrieval.
    pub async fn submit(&self, request: &CreatePdfRequest) -> Result<ResultId> {
        if request.pages.is_empty() {
            return Err(Error::EmptySubmission);
        }

        let response = self.backend.create_pdf(request).await?;
        let result_id = response.result_id.ok_or_else(|| {
            Error::SubmissionFailed(
                response
                    .message
                    .unwrap_or_else(|| "response did not include a result id".to_string()),
            )
        })?;

        info!(
            "Submitted {} pages as {} (result {})",
            request.pages.len(),
            request.filename,
            result_id
        );
        Ok(result_id)
    }
}
