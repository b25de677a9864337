//! End-to-end tests for the HTTP surface.
//!
//! Each test serves the real router on an ephemeral port with a mock
//! provider injected, then drives it over HTTP the way a client would.

use std::io::Cursor;
use std::sync::Arc;

use foliar_api::{build_router, AppState};
use foliar_core::{AppConfig, UploadPolicy};
use foliar_vision::mock::MockProvider;

const VALID_REPLY: &str = r#"{
    "disease_name": "Tomato Early Blight",
    "confidence": "High",
    "description": "Concentric rings on the lower leaves indicate early blight.",
    "symptoms": ["brown lesions", "yellow halo"],
    "treatment": ["remove affected leaves", "apply copper fungicide"],
    "prevention": ["rotate crops", "water at soil level"],
    "severity": "Moderate"
}"#;

fn test_config() -> AppConfig {
    AppConfig {
        upload: UploadPolicy {
            max_file_size: 64 * 1024,
            ..UploadPolicy::default()
        },
        ..AppConfig::default()
    }
}

async fn spawn_server(config: AppConfig, provider: MockProvider) -> String {
    let state = AppState::new(config, Arc::new(provider));
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([40, 160, 60]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

async fn post_file(
    base_url: &str,
    data: Vec<u8>,
    content_type: &str,
    filename: &str,
) -> reqwest::Response {
    let part = reqwest::multipart::Part::bytes(data)
        .file_name(filename.to_string())
        .mime_str(content_type)
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    reqwest::Client::new()
        .post(format!("{}/analyze", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_analyze_maps_valid_reply_exactly() {
    let mock = MockProvider::with_reply(VALID_REPLY).with_model("llama-3.2-90b-vision-preview");
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let before = chrono::Utc::now();
    let response = post_file(&base_url, png_bytes(32, 32), "image/png", "leaf.png").await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["disease_name"], "Tomato Early Blight");
    assert_eq!(body["confidence"], "High");
    assert_eq!(body["severity"], "Moderate");
    assert_eq!(body["symptoms"][0], "brown lesions");
    assert_eq!(body["treatment"][1], "apply copper fungicide");
    assert_eq!(body["prevention"][0], "rotate crops");
    assert_eq!(body["model_used"], "llama-3.2-90b-vision-preview");

    // Timestamp is generated at response time, not taken from the model.
    let ts = chrono::DateTime::parse_from_rfc3339(body["timestamp"].as_str().unwrap()).unwrap();
    assert!(ts >= before - chrono::Duration::seconds(1));

    assert_eq!(mock.call_count(), 1);
}

#[tokio::test]
async fn test_disallowed_content_type_never_reaches_provider() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let response = post_file(&base_url, png_bytes(8, 8), "image/gif", "leaf.gif").await;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("image/gif"));
    assert_eq!(body["path"], "/analyze");
    assert!(body["timestamp"].is_string());

    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_oversize_upload_is_413_before_decoding() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    // Garbage bytes over the 64 KiB test limit: if the size gate ran after
    // decoding, this would surface as CorruptImage/400 instead of 413.
    let oversized = vec![0u8; 100 * 1024];
    let response = post_file(&base_url, oversized, "image/png", "huge.png").await;
    assert_eq!(response.status(), 413);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("maximum upload size"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_upload_beyond_transport_cap_keeps_error_shape() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    // Well past the 64 KiB limit plus the 1 MiB framing slack, so the
    // request is refused at the transport layer before the handler runs.
    // The response must still be 413 with the JSON error body, not the
    // body-cap layer's plain-text rejection.
    let enormous = vec![0u8; 3 * 1024 * 1024];
    let response = post_file(&base_url, enormous, "image/png", "enormous.png").await;
    assert_eq!(response.status(), 413);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("upload size"));
    assert_eq!(body["path"], "/analyze");
    assert!(body["timestamp"].is_string());
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_undecodable_bytes_with_allowed_type_are_400() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let response = post_file(
        &base_url,
        b"not an image at all".to_vec(),
        "image/png",
        "fake.png",
    )
    .await;
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("could not be decoded"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_missing_file_field_is_400() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let form = reqwest::multipart::Form::new().text("note", "no file here");
    let response = reqwest::Client::new()
        .post(format!("{}/analyze", base_url))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["detail"].as_str().unwrap().contains("file"));
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_reply_is_degraded_success() {
    let mock = MockProvider::with_reply("I think this leaf might have some kind of spot disease.");
    let base_url = spawn_server(test_config(), mock).await;

    let response = post_file(&base_url, png_bytes(16, 16), "image/png", "leaf.png").await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["confidence"], "Low");
    assert_eq!(body["disease_name"], "Unknown");
    // Raw reply text is carried in the description so nothing is lost.
    assert!(body["description"]
        .as_str()
        .unwrap()
        .contains("spot disease"));
    // Schema invariants hold even in the degraded case.
    assert!(body["symptoms"].as_array().unwrap().len() >= 1);
    assert!(body["treatment"].as_array().unwrap().len() >= 1);
    assert!(body["prevention"].as_array().unwrap().len() >= 1);
    assert_eq!(body["severity"], "Moderate");
}

#[tokio::test]
async fn test_out_of_set_severity_is_normalized() {
    let reply = r#"{"disease_name": "Blight", "severity": "Catastrophic", "confidence": "High"}"#;
    let mock = MockProvider::with_reply(reply);
    let base_url = spawn_server(test_config(), mock).await;

    let response = post_file(&base_url, png_bytes(16, 16), "image/png", "leaf.png").await;
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["severity"], "Moderate");
    assert_ne!(body["severity"], "Catastrophic");
}

#[tokio::test]
async fn test_provider_rejection_is_sanitized_500() {
    let mock = MockProvider::rejected(401, "Invalid API Key sk-secret-123");
    let base_url = spawn_server(test_config(), mock).await;

    let response = post_file(&base_url, png_bytes(16, 16), "image/png", "leaf.png").await;
    assert_eq!(response.status(), 500);

    let body: serde_json::Value = response.json().await.unwrap();
    let detail = body["detail"].as_str().unwrap();
    assert!(!detail.contains("sk-secret-123"));
    assert!(!detail.contains("401"));
    assert_eq!(body["path"], "/analyze");
}

#[tokio::test]
async fn test_provider_unavailable_is_500() {
    let mock = MockProvider::unavailable("connect timeout");
    let base_url = spawn_server(test_config(), mock).await;

    let response = post_file(&base_url, png_bytes(16, 16), "image/png", "leaf.png").await;
    assert_eq!(response.status(), 500);
}

#[tokio::test]
async fn test_health_is_independent_of_provider() {
    // Provider that would fail every call; /health must not care.
    let mock = MockProvider::unavailable("provider is down");
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let response = reqwest::Client::new()
        .get(format!("{}/health", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["message"].is_string());
    assert!(body["version"].is_string());
    assert!(body["timestamp"].is_string());

    // Liveness never exercised the pipeline.
    assert_eq!(mock.call_count(), 0);
}

#[tokio::test]
async fn test_service_info_reports_policy() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(AppConfig::default(), mock).await;

    let response = reqwest::Client::new()
        .get(format!("{}/", base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["max_file_size_mb"], 10);
    assert!(body["endpoints"]["/analyze"].is_string());
    assert!(body["supported_extensions"]
        .as_array()
        .unwrap()
        .iter()
        .any(|e| e == ".webp"));
}

#[tokio::test]
async fn test_two_identical_uploads_both_satisfy_schema() {
    let mock = MockProvider::with_reply(VALID_REPLY);
    let base_url = spawn_server(test_config(), mock.clone()).await;

    let bytes = png_bytes(24, 24);
    for _ in 0..2 {
        let response = post_file(&base_url, bytes.clone(), "image/png", "leaf.png").await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        for key in [
            "disease_name",
            "confidence",
            "description",
            "symptoms",
            "treatment",
            "prevention",
            "severity",
            "timestamp",
            "model_used",
        ] {
            assert!(!body[key].is_null(), "missing key {}", key);
        }
    }
    assert_eq!(mock.call_count(), 2);
}
