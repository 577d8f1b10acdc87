/// Health check endpoints
use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health", get(health_basic))
        .route("/health/ready", get(readiness_probe))
}

/// Basic liveness check
async fn health_basic() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe
///
/// Returns 200 when the database answers, 503 otherwise.
async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    if let Err(e) = crate::db::test_connection(&ctx.db).await {
        tracing::warn!(error = %e, "readiness probe failed: database check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(serde_json::json!({
        "status": "ready",
        "version": env!("CARGO_PKG_VERSION")
    })))
}
