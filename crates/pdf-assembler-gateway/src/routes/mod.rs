//! HTTP routes for the gateway.
//!
//! Everything under `/api/proxy/` is forwarded to the backend with the
//! credential attached; only `/health` is answered locally.

mod health;
mod proxy;

pub use health::health;
pub use proxy::proxy;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, header},
    routing::{any, get},
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::state::GatewayState;

/// Build the gateway router. `body_limit` caps forwarded request bodies in bytes.
pub fn router(state: Arc<GatewayState>, body_limit: usize) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/proxy/{*path}", any(proxy))
        // Proxied responses reflect live backend state
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
