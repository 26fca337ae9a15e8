//! HTTP router assembly.
//!
//! Exposes the collaboration WebSocket endpoint and a liveness probe, with
//! CORS and request tracing layered on top.

use axum::{routing::get, Json, Router};
use http::HeaderValue;
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{collaboration_ws, RelayState};

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the CORS layer. An empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if parsed.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(parsed))
    }
}

/// Full application router.
///
/// # Example
///
/// ```ignore
/// let app = relay_router(state, &config.server.cors_origins);
/// axum::serve(listener, app).await?;
/// ```
pub fn relay_router(state: RelayState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/ws/collaboration/:document_id", get(collaboration_ws))
        .route("/health", get(health))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
