//! Centralized default constants for foliar.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers. Policy values (limits, allow-sets) are deployment configuration
//! with these as fallbacks, not hard-coded contracts.

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP bind host.
pub const SERVER_HOST: &str = "0.0.0.0";

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;

/// Default request-level timeout in seconds. Bounds the whole pipeline
/// (validate + normalize + provider call + map) for one request.
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

// =============================================================================
// UPLOAD POLICY
// =============================================================================

/// Maximum accepted upload size in bytes (10 MiB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Declared MIME types accepted by the upload validator.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// File extensions reported in service metadata (mirrors the MIME allow-set).
pub const ALLOWED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".webp"];

// =============================================================================
// IMAGE NORMALIZATION
// =============================================================================

/// Maximum width or height before an image is downscaled for transport.
pub const MAX_IMAGE_DIMENSION: u32 = 1024;

/// JPEG quality factor used when re-encoding downscaled images.
pub const JPEG_QUALITY: u8 = 85;

// =============================================================================
// VISION PROVIDER
// =============================================================================

/// Default OpenAI-compatible base URL for the Groq API.
pub const PROVIDER_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default vision model.
pub const PROVIDER_MODEL: &str = "llama-3.2-90b-vision-preview";

/// Sampling temperature. Low, for stable diagnoses.
pub const PROVIDER_TEMPERATURE: f32 = 0.3;

/// Completion token budget.
pub const PROVIDER_MAX_TOKENS: u32 = 1024;

/// Outbound call timeout in seconds. The call is never retried at this
/// layer; a retry would silently duplicate a paid classification.
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// DEGRADED-REPLY FALLBACKS
// =============================================================================
//
// Substituted by the reply mapper when the model omits a field or returns
// something unparseable. Constants, not wire contracts.

/// Disease name when the reply could not be interpreted.
pub const FALLBACK_DISEASE_NAME: &str = "Unknown";

/// Description prefix for a reply that failed to parse. The raw reply text
/// is appended so no information is lost.
pub const FALLBACK_DESCRIPTION_PREFIX: &str =
    "Unable to parse the model reply into a structured diagnosis. Raw reply: ";

/// Placeholder symptom entry when the reply carried none.
pub const FALLBACK_SYMPTOM: &str = "Analysis completed - check description for details";

/// Placeholder treatment entry when the reply carried none.
pub const FALLBACK_TREATMENT: &str = "Consult with agricultural expert for specific treatment";

/// Placeholder prevention entry when the reply carried none.
pub const FALLBACK_PREVENTION: &str = "Maintain proper plant hygiene and monitoring";

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Required Groq API key.
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";

/// Override for the provider base URL.
pub const ENV_GROQ_BASE_URL: &str = "GROQ_BASE_URL";

/// Override for the vision model.
pub const ENV_GROQ_MODEL: &str = "GROQ_MODEL";

/// Override for the provider timeout in seconds.
pub const ENV_GROQ_TIMEOUT: &str = "GROQ_TIMEOUT";

/// Bind host override.
pub const ENV_HOST: &str = "HOST";

/// Bind port override.
pub const ENV_PORT: &str = "PORT";

/// Comma-separated CORS origin whitelist.
pub const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";

/// Upload size limit override in bytes.
pub const ENV_MAX_FILE_SIZE: &str = "MAX_FILE_SIZE";
