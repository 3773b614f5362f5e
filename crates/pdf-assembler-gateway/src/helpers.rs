//! Helper types and traits for cleaner route handlers.
//!
//! Errors leave the gateway as `{"error": "..."}` JSON with the matching
//! status, which is the shape clients look for when extracting a message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// A status plus a message, rendered as a JSON error body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

/// Standard result type for route handlers.
pub type RouteResult<T> = Result<T, ApiError>;

/// Extension trait for converting `Option<T>` to `RouteResult<T>`.
pub trait OptionExt<T> {
    /// Returns the contained value or a 500 with the given message.
    fn or_misconfigured(self, msg: &str) -> RouteResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn or_misconfigured(self, msg: &str) -> RouteResult<T> {
        self.ok_or_else(|| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, msg))
    }
}

/// Extension trait for converting `Result<T, E>` to `RouteResult<T>`.
pub trait ResultExt<T, E: std::fmt::Display> {
    /// Logs the error and converts it to a generic 500.
    fn or_internal_error(self) -> RouteResult<T>;
}

impl<T, E: std::fmt::Display> ResultExt<T, E> for Result<T, E> {
    fn or_internal_error(self) -> RouteResult<T> {
        self.map_err(|e| {
            tracing::error!("Proxy error: {}", e);
            ApiError::internal()
        })
    }
}
