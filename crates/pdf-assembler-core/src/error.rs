use thiserror::Error;

use crate::assembly::RequestKind;

/// Unified error type for pdf-assembler-core
///
/// Every operation resolves to either a value or one of these. The
/// `Display` text is what the session keeps as its most recent error:
/// - Local validation (rejected before any network call)
/// - Transport failures and non-success HTTP statuses
/// - Backend responses that succeeded but are missing expected data
/// - Configuration and misconfiguration
#[derive(Error, Debug)]
pub enum Error {
    // ==========================================================================
    // Local Validation Errors
    // ==========================================================================
    /// Nothing was selected for upload
    #[error("No file selected.")]
    NoFileSelected,

    /// The selected file is not declared as a PDF
    #[error("Please select a valid PDF file (got {found}).")]
    InvalidMediaType { found: String },

    /// Submission attempted with no staged pages
    #[error("No pages to combine. Upload at least one PDF first.")]
    EmptySubmission,

    /// Page reference not present in the assembly
    #[error("no staged page {0}")]
    UnknownPage(String),

    /// Document name not present in the assembly
    #[error("no staged file named '{0}'")]
    UnknownDocument(String),

    // ==========================================================================
    // Transport Errors
    // ==========================================================================
    /// Network failure before a response arrived
    #[error("request failed: {0}")]
    Transport(String),

    /// Request timed out
    #[error("request timed out")]
    Timeout,

    /// Backend answered with a non-success status
    #[error("{message}")]
    Status { status: u16, message: String },

    // ==========================================================================
    // Backend Response Errors
    // ==========================================================================
    /// Backend reported success but the payload lacks the expected data
    #[error("Upload successful but processing failed: {0}")]
    ProcessingFailed(String),

    /// Create-pdf succeeded but returned no result handle
    #[error("PDF creation failed: {0}")]
    SubmissionFailed(String),

    /// Response body could not be decoded
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// A request of this kind is already pending
    #[error("{0} already in progress")]
    RequestInFlight(RequestKind),

    // ==========================================================================
    // Configuration Errors
    // ==========================================================================
    /// Backend origin or credential missing
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// Failed to load configuration file
    #[error("failed to load config: {0}")]
    ConfigLoad(String),

    /// Invalid configuration value
    #[error("invalid config value for '{field}': {reason}")]
    ConfigInvalid { field: String, reason: String },

    // ==========================================================================
    // I/O Errors
    // ==========================================================================
    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether the error was raised locally without touching the network.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NoFileSelected
                | Self::InvalidMediaType { .. }
                | Self::EmptySubmission
                | Self::UnknownPage(_)
                | Self::UnknownDocument(_)
                | Self::RequestInFlight(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_backend_message() {
        let err = Error::Status {
            status: 404,
            message: "PDF result not found".to_string(),
        };
        assert_eq!(err.to_string(), "PDF result not found");
    }

    #[test]
    fn test_submission_failure_message() {
        let err = Error::SubmissionFailed("response did not include a result id".into());
        assert_eq!(
            err.to_string(),
            "PDF creation failed: response did not include a result id"
        );
        assert!(!err.to_string().contains("Upload"));
    }

    #[test]
    fn test_local_classification() {
        assert!(Error::EmptySubmission.is_local());
        assert!(Error::InvalidMediaType { found: "image/png".into() }.is_local());
        assert!(!Error::Transport("connection refused".into()).is_local());
        assert!(!Error::ProcessingFailed("bad".into()).is_local());
        assert!(!Error::SubmissionFailed("bad".into()).is_local());
        assert!(Error::UnknownPage("a.pdf:9".into()).is_local());
    }
}
