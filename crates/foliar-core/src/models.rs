//! Data model for the diagnosis pipeline.
//!
//! Every entity here is per-request and immutable after construction.
//! Nothing is persisted; an [`UploadedFile`] lives only until its
//! [`NormalizedImage`] is built, and both are dropped when the request
//! handler finishes.

use serde::{Deserialize, Serialize};

// =============================================================================
// CLOSED ENUMS
// =============================================================================

/// Confidence level of a diagnosis. Closed set; values outside it are
/// normalized by [`Confidence::parse`] and never reach clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    #[default]
    Medium,
    Low,
}

impl Confidence {
    /// Lenient, case-insensitive parse. Anything outside the closed set
    /// collapses to `Medium` so model output variance cannot widen the
    /// contract.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Confidence::High,
            "medium" => Confidence::Medium,
            "low" => Confidence::Low,
            _ => Confidence::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

/// Severity of the diagnosed condition. Closed set, same normalization
/// rules as [`Confidence`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Healthy,
    Mild,
    #[default]
    Moderate,
    Severe,
}

impl Severity {
    /// Lenient, case-insensitive parse; out-of-set values collapse to
    /// `Moderate`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "healthy" => Severity::Healthy,
            "mild" => Severity::Mild,
            "moderate" => Severity::Moderate,
            "severe" => Severity::Severe,
            _ => Severity::default(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Healthy => "Healthy",
            Severity::Mild => "Mild",
            Severity::Moderate => "Moderate",
            Severity::Severe => "Severe",
        }
    }
}

// =============================================================================
// PIPELINE ENTITIES
// =============================================================================

/// One multipart upload, exactly as the client declared it. Exists only
/// for the duration of a single request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub content_type: String,
    pub filename: String,
}

/// Transport-ready image: decoded, bounded in dimension, re-encoded if it
/// had to be downscaled. Discarded once the provider call returns.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    pub data: Vec<u8>,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
}

/// Unparsed reply from the vision provider. Expected to contain JSON but
/// treated as opaque text until the mapper has a look.
#[derive(Debug, Clone)]
pub struct DiagnosisRaw {
    /// Free-text reply content.
    pub text: String,
    /// Identifier of the model that actually served the request.
    pub model: String,
}

/// Canonical diagnosis returned to clients.
///
/// Invariant: every field is always present and non-null. Missing or
/// malformed upstream fields are replaced with defined fallbacks by the
/// reply mapper; `timestamp` and `model_used` are populated by this
/// service, never trusted from the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub disease_name: String,
    pub confidence: Confidence,
    pub description: String,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub severity: Severity,
    /// RFC 3339 timestamp generated at response time.
    pub timestamp: String,
    pub model_used: String,
}
