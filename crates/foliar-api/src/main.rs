//! foliar-api - HTTP API server for leaf disease diagnosis

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use foliar_api::{build_router, AppState};
use foliar_core::AppConfig;
use foliar_vision::GroqVisionProvider;

/// OpenAPI documentation (utoipa metadata for the handler annotations).
#[allow(dead_code)]
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Foliar Leaf Disease Detection API",
        version = "0.1.0",
        description = "AI-powered plant disease detection from leaf images"
    ),
    paths(
        foliar_api::handlers::meta::service_info,
        foliar_api::handlers::meta::health_check,
        foliar_api::handlers::analyze::analyze_leaf,
    ),
    tags(
        (name = "System", description = "Metadata and health checks"),
        (name = "Analysis", description = "Leaf image diagnosis")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT - "json" or "text" (default: "text")
    //   RUST_LOG   - standard env filter (default: "foliar_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "foliar_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    // Configuration is read once here and immutable afterwards. A missing
    // API key fails the process now instead of the first analyze request.
    let config = AppConfig::from_env()?;
    let provider = Arc::new(GroqVisionProvider::new(config.provider.clone())?);

    info!(
        model = provider.config().model.as_str(),
        max_file_size = config.upload.max_file_size,
        "Configuration loaded"
    );

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let app = build_router(AppState::new(config, provider));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
