//! Startup configuration.
//!
//! All values are read once from the environment at process start and are
//! immutable afterwards. Components receive the relevant section
//! explicitly instead of reading ambient global state, so tests can inject
//! fakes.

use crate::defaults;
use crate::error::{Error, Result};

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// CORS origin whitelist. Empty means no cross-origin access.
    pub cors_origins: Vec<String>,
    /// Whole-pipeline timeout per request.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            cors_origins: vec!["http://localhost:8501".to_string()],
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Upload validation policy, enforced before any expensive work.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_file_size: defaults::MAX_FILE_SIZE,
            allowed_mime_types: defaults::ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl UploadPolicy {
    /// Check a declared content type against the allow-set. Parameters
    /// after a `;` (e.g. `image/png; charset=binary`) are ignored.
    pub fn allows_mime(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        self.allowed_mime_types.iter().any(|m| *m == essence)
    }

    /// Max upload size in whole megabytes, for service metadata.
    pub fn max_file_size_mb(&self) -> usize {
        self.max_file_size / (1024 * 1024)
    }
}

/// Image normalization policy.
#[derive(Debug, Clone)]
pub struct ImagePolicy {
    /// Largest width or height sent onward without downscaling.
    pub max_dimension: u32,
    /// JPEG quality when a downscaled image is re-encoded.
    pub jpeg_quality: u8,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self {
            max_dimension: defaults::MAX_IMAGE_DIMENSION,
            jpeg_quality: defaults::JPEG_QUALITY,
        }
    }
}

/// Vision provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PROVIDER_BASE_URL.to_string(),
            api_key: String::new(),
            model: defaults::PROVIDER_MODEL.to_string(),
            temperature: defaults::PROVIDER_TEMPERATURE,
            max_tokens: defaults::PROVIDER_MAX_TOKENS,
            timeout_seconds: defaults::PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upload: UploadPolicy,
    pub image: ImagePolicy,
    pub provider: ProviderConfig,
}

impl AppConfig {
    /// Load configuration from the environment. Fails fast with
    /// [`Error::Config`] when the provider API key is missing, rather than
    /// failing on the first analyze request.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::ENV_GROQ_API_KEY)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "{} must be set in the environment or .env file",
                    defaults::ENV_GROQ_API_KEY
                ))
            })?;

        let server = ServerConfig {
            host: std::env::var(defaults::ENV_HOST)
                .unwrap_or_else(|_| defaults::SERVER_HOST.to_string()),
            port: std::env::var(defaults::ENV_PORT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::SERVER_PORT),
            cors_origins: std::env::var(defaults::ENV_CORS_ORIGINS)
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| ServerConfig::default().cors_origins),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECS,
        };

        let upload = UploadPolicy {
            max_file_size: std::env::var(defaults::ENV_MAX_FILE_SIZE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::MAX_FILE_SIZE),
            ..UploadPolicy::default()
        };

        let provider = ProviderConfig {
            base_url: std::env::var(defaults::ENV_GROQ_BASE_URL)
                .unwrap_or_else(|_| defaults::PROVIDER_BASE_URL.to_string()),
            api_key,
            model: std::env::var(defaults::ENV_GROQ_MODEL)
                .unwrap_or_else(|_| defaults::PROVIDER_MODEL.to_string()),
            timeout_seconds: std::env::var(defaults::ENV_GROQ_TIMEOUT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
            ..ProviderConfig::default()
        };

        Ok(Self {
            server,
            upload,
            image: ImagePolicy::default(),
            provider,
        })
    }
}
