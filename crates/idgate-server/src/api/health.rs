use axum::response::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ReadinessResponse {
    status: &'static str,
}

/// Readiness check endpoint
pub async fn readiness_check() -> Json<ReadinessResponse> {
    // The gateway holds no local state; reachable means ready.
    Json(ReadinessResponse { status: "ready" })
}
