//! Health-check handler shared by the three services.

use axum::Json;

use crate::dto::HealthResponse;

/// `GET /health` — liveness probe with the core version.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: courier_core::version().into(),
    })
}
