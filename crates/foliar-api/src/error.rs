//! HTTP error mapping.
//!
//! Every error crossing the handler boundary is converted to the wire
//! shape `{detail, timestamp, path}`. No internal error type, stack trace,
//! or provider credential is ever serialized to the client: client-caused
//! errors carry an actionable detail, dependency-caused errors carry a
//! generic one while the full error goes to the log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, warn};

use foliar_core::Error;

/// Error body shape shared by all non-2xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub timestamp: String,
    pub path: String,
}

/// An error bound to the request path it occurred on.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
    path: String,
}

impl ApiError {
    /// Map a pipeline error onto a status code and sanitized detail.
    pub fn from_pipeline(err: Error, path: &str) -> Self {
        let (status, detail) = match &err {
            Error::InvalidMediaType(mime) => (
                StatusCode::BAD_REQUEST,
                format!(
                    "Unsupported media type '{}'. Upload a JPEG, PNG, or WebP image.",
                    mime
                ),
            ),
            Error::PayloadTooLarge { size, limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                format!(
                    "File of {} bytes exceeds the maximum upload size of {} bytes.",
                    size, limit
                ),
            ),
            Error::CorruptImage(_) => (
                StatusCode::BAD_REQUEST,
                "The uploaded file could not be decoded as an image.".to_string(),
            ),
            Error::UpstreamUnavailable(_) | Error::UpstreamRejected { .. } => {
                // Full detail (status, provider message) goes to the log for
                // support correlation, never to the client.
                error!(error = %err, "Vision provider call failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The diagnosis service is temporarily unavailable. Please try again later."
                        .to_string(),
                )
            }
            Error::Config(_) | Error::Serialization(_) | Error::Internal(_) => {
                error!(error = %err, "Internal error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred while analyzing the image.".to_string(),
                )
            }
        };

        if status.is_client_error() {
            warn!(error = %err, %status, "Rejected upload");
        }

        Self {
            status,
            detail,
            path: path.to_string(),
        }
    }

    /// A 400 with a caller-supplied actionable detail (multipart framing
    /// problems, missing file field).
    pub fn bad_request(detail: impl Into<String>, path: &str) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, detail, path)
    }

    /// An error that already knows its status code. Used where a rejection
    /// originates outside the pipeline (transport body cap, request timeout)
    /// but must still wear the common error body.
    pub fn with_status(status: StatusCode, detail: impl Into<String>, path: &str) -> Self {
        Self {
            status,
            detail: detail.into(),
            path: path.to_string(),
        }
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail,
            timestamp: Utc::now().to_rfc3339(),
            path: self.path,
        };
        (self.status, Json(body)).into_response()
    }
}
