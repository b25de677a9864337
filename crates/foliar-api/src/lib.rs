//! # foliar-api
//!
//! HTTP API server for foliar.
//!
//! Exposes three endpoints: `GET /` (service metadata), `GET /health`
//! (process liveness, never touches the provider), and `POST /analyze`
//! (the diagnosis pipeline). Each request is handled independently with
//! no shared mutable state; configuration and the provider handle are
//! read-only after startup.

pub mod error;
pub mod handlers;
pub mod normalize;
pub mod upload;

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;
use uuid::Uuid;

use foliar_core::AppConfig;
use foliar_vision::DiagnosisProvider;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

/// Shared, read-only application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub provider: Arc<dyn DiagnosisProvider>,
}

impl AppState {
    pub fn new(config: AppConfig, provider: Arc<dyn DiagnosisProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
        }
    }
}

/// Slack added on top of the upload limit so multipart framing overhead
/// never trips the transport-level body cap; the upload validator owns the
/// 413 and its error body for any file that fits under the cap.
const BODY_LIMIT_SLACK: usize = 1024 * 1024;

/// Rewrite transport-level rejections into the common error body.
///
/// The body-cap and timeout layers synthesize their 413/408 responses with
/// plain-text or empty bodies. Every other error on this service is JSON
/// `{detail, timestamp, path}`, so those two are rewritten here; responses
/// already carrying a JSON body pass through untouched.
async fn enforce_error_body(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let status = response.status();
    if status != StatusCode::PAYLOAD_TOO_LARGE && status != StatusCode::REQUEST_TIMEOUT {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("application/json"))
        .unwrap_or(false);
    if is_json {
        return response;
    }

    let detail = if status == StatusCode::PAYLOAD_TOO_LARGE {
        "Request body exceeds the maximum upload size."
    } else {
        "Request timed out before the analysis completed."
    };
    error::ApiError::with_status(status, detail, &path).into_response()
}

/// Build the service router with its middleware stack.
pub fn build_router(state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    let body_limit = state.config.upload.max_file_size + BODY_LIMIT_SLACK;

    let allowed_origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .route("/analyze", post(handlers::analyze_leaf))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::ACCEPT, header::CONTENT_TYPE])
                .max_age(Duration::from_secs(3600)),
        )
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(enforce_error_body))
        .with_state(state)
}
