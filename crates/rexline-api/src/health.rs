// Liveness endpoints

use axum::{routing::get, Json, Router};
use serde::Serialize;
use utoipa::ToSchema;

pub const LIVENESS_TEXT: &str = "TimeRex LINE relay is running!";

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

pub fn routes() -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
}

/// GET / - Plain-text liveness check
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Service is running", body = String)),
    tag = "health"
)]
pub async fn home() -> &'static str {
    LIVENESS_TEXT
}

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "health"
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
