//! Error types for foliar.

use thiserror::Error;

/// Result type alias using foliar's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the diagnosis pipeline.
///
/// The first three variants are client-caused and map to 4xx at the HTTP
/// boundary; the `Upstream*` variants are dependency-caused and map to 500.
/// A reply that arrives but cannot be parsed is *not* an error — the
/// parser handles that as a degraded-success result.
#[derive(Error, Debug)]
pub enum Error {
    /// Declared content type is outside the allow-set
    #[error("Unsupported media type: {0}")]
    InvalidMediaType(String),

    /// Upload exceeds the configured size limit
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    /// Bytes did not decode as an image
    #[error("Corrupt image: {0}")]
    CorruptImage(String),

    /// Network failure or timeout reaching the vision provider
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Provider answered with a non-success status
    #[error("Upstream rejected request ({status}): {message}")]
    UpstreamRejected { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// Whether the error was caused by the client's upload rather than a
    /// dependency or the service itself.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidMediaType(_) | Error::PayloadTooLarge { .. } | Error::CorruptImage(_)
        )
    }
}
