//! Leaf analysis handler.
//!
//! Composes the pipeline strictly in order: upload validation → image
//! normalization → provider call → reply mapping. Each stage is a hard
//! gate; a failure short-circuits everything after it and is translated
//! into the `{detail, timestamp, path}` error shape.

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, OriginalUri, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, info};

use foliar_core::{AnalysisResult, UploadedFile};
use foliar_vision::{map_reply, ANALYSIS_PROMPT};

use crate::error::ApiError;
use crate::{normalize, upload, AppState};

/// Analyze an uploaded leaf image for diseases.
///
/// Accepts multipart/form-data with a single `file` field and returns the
/// structured diagnosis. A reply the model formatted badly still yields
/// 200 with a degraded result; only upload problems (4xx) and provider
/// failures (500) produce errors.
///
/// # Multipart Fields
/// - `file`: Leaf image, JPEG/PNG/WebP (required)
///
/// # Returns
/// - 200 OK with the diagnosis (possibly degraded)
/// - 400 Bad Request on an unsupported or undecodable upload
/// - 413 Payload Too Large when the file exceeds the configured limit
/// - 500 Internal Server Error when the vision provider fails
#[utoipa::path(post, path = "/analyze", tag = "Analysis",
    responses(
        (status = 200, description = "Structured diagnosis"),
        (status = 400, description = "Invalid upload"),
        (status = 413, description = "Upload exceeds size limit"),
        (status = 500, description = "Vision provider failure"),
    ))]
pub async fn analyze_leaf(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, ApiError> {
    let path = uri.path().to_string();

    let file = read_file_field(multipart, &path, state.config.upload.max_file_size).await?;
    debug!(
        filename = %file.filename,
        content_type = %file.content_type,
        bytes = file.data.len(),
        "Received upload"
    );

    // Gate 1: declared type and size, before any expensive work.
    upload::validate_upload(&state.config.upload, &file)
        .map_err(|e| ApiError::from_pipeline(e, &path))?;

    // Gate 2: decode and bound dimensions for transport.
    let image = normalize::normalize(&state.config.image, &file)
        .map_err(|e| ApiError::from_pipeline(e, &path))?;
    drop(file);

    // Gate 3: the single outbound call. Not retried here.
    let raw = state
        .provider
        .submit(&image, ANALYSIS_PROMPT)
        .await
        .map_err(|e| ApiError::from_pipeline(e, &path))?;
    drop(image);

    // Gate 4: lenient mapping; never fails.
    let result = map_reply(&raw);

    info!(
        disease = %result.disease_name,
        severity = result.severity.as_str(),
        confidence = result.confidence.as_str(),
        model = %result.model_used,
        "Analysis complete"
    );

    Ok(Json(result))
}

/// Pull the `file` field out of the multipart form.
async fn read_file_field(
    mut multipart: Multipart,
    path: &str,
    upload_limit: usize,
) -> Result<UploadedFile, ApiError> {
    let mut file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, path, upload_limit))?
    {
        if field.name() != Some("file") {
            continue; // ignore unknown fields
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, path, upload_limit))?
            .to_vec();

        file = Some(UploadedFile {
            data,
            content_type,
            filename,
        });
    }

    let file = file
        .ok_or_else(|| ApiError::bad_request("Missing 'file' field in multipart form", path))?;

    if file.data.is_empty() {
        return Err(ApiError::bad_request("Uploaded file is empty", path));
    }

    Ok(file)
}

/// A chunked-transfer body that overruns the transport cap surfaces here as
/// a multipart read error with a 413 status; report it as the size-limit
/// rejection it is rather than a malformed-form 400.
fn multipart_error(err: MultipartError, path: &str, upload_limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::with_status(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "File exceeds the maximum upload size of {} bytes.",
                upload_limit
            ),
            path,
        )
    } else {
        ApiError::bad_request(format!("Malformed multipart form: {}", err), path)
    }
}
