//! Proxy route - forwards `/api/proxy/{*path}` to the backend.

use axum::{
    Json,
    body::Body,
    extract::{Path, RawQuery, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::TryStreamExt;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::helpers::{ApiError, OptionExt, ResultExt, RouteResult};
use crate::state::GatewayState;

const API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_DISPOSITION: &str = "attachment; filename=\"download.pdf\"";

/// Content types relayed as opaque bytes instead of parsed JSON.
fn is_binary(content_type: &str) -> bool {
    content_type.contains("application/pdf") || content_type.contains("application/octet-stream")
}

/// Forward the request unchanged, adding the backend credential.
///
/// Binary responses are streamed back with their disposition; everything
/// else is parsed as JSON and re-emitted.
pub async fn proxy(
    State(state): State<Arc<GatewayState>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> RouteResult<Response> {
    let api_base = state
        .api_base
        .as_deref()
        .or_misconfigured("API base URL not configured")?;
    let api_key = state
        .api_key
        .as_deref()
        .or_misconfigured("API key not configured")?;

    let mut url = format!("{}/{}", api_base.trim_end_matches('/'), path);
    if let Some(query) = query {
        url.push('?');
        url.push_str(&query);
    }
    debug!("Forwarding {} {}", method, url);

    let has_body = method != Method::GET && method != Method::HEAD;
    let mut request = state
        .client
        .request(method, &url)
        .header(API_KEY_HEADER, api_key);
    if has_body {
        if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
            request = request.header(header::CONTENT_TYPE, content_type.clone());
        }
        request = request.body(body);
    }

    let response = request.send().await.or_internal_error()?;
    let status = response.status();

    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        warn!("Backend returned {} for {}: {}", status, path, text);
        return Err(ApiError::new(status, format!("Backend request failed: {text}")));
    }

    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if is_binary(&content_type) {
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_DISPOSITION));

        let stream = response
            .bytes_stream()
            .inspect_err(|e| warn!("Upstream stream error: {}", e));

        return Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, content_type)
            .header(header::CONTENT_DISPOSITION, disposition)
            .body(Body::from_stream(stream))
            .or_internal_error();
    }

    let data = response
        .json::<serde_json::Value>()
        .await
        .or_internal_error()?;
    Ok(Json(data).into_response())
}
