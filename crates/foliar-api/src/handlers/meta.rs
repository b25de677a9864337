//! Service metadata and health handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use crate::AppState;

/// Service metadata: name, version, endpoint map, upload policy summary.
#[utoipa::path(get, path = "/", tag = "System",
    responses((status = 200, description = "Service metadata")))]
pub async fn service_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": "Foliar Leaf Disease Detection API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-powered plant disease detection from leaf images",
        "endpoints": {
            "/": "Service metadata",
            "/health": "Health check",
            "/analyze": "Analyze a leaf image for diseases (POST, multipart)"
        },
        "supported_extensions": foliar_core::defaults::ALLOWED_EXTENSIONS,
        "max_file_size_mb": state.config.upload.max_file_size_mb(),
    }))
}

/// Process liveness only. Deliberately does not touch the vision provider,
/// so it answers in constant time even when the upstream is down.
#[utoipa::path(get, path = "/health", tag = "System",
    responses((status = 200, description = "Service is live")))]
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "message": "API is running successfully",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
