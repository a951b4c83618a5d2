//! Liveness endpoint.

use axum::http::StatusCode;

/// GET /health
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}
