//! Groq vision provider (OpenAI-compatible chat completions).
//!
//! Sends the normalized image as a base64 data URL alongside the
//! instruction prompt. Exactly one outbound call per submission with a
//! bounded timeout; network failures map to `UpstreamUnavailable` and
//! non-success provider statuses map to `UpstreamRejected` without
//! altering the provider's own message.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use foliar_core::{defaults, DiagnosisRaw, Error, NormalizedImage, ProviderConfig, Result};

use crate::provider::DiagnosisProvider;

/// Groq-backed vision provider.
pub struct GroqVisionProvider {
    client: Client,
    config: ProviderConfig,
}

impl GroqVisionProvider {
    /// Create a provider with the given configuration.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing Groq vision provider: url={}, model={}",
            config.base_url, config.model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables. `GROQ_API_KEY` is required.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(defaults::ENV_GROQ_API_KEY)
            .map_err(|_| Error::Config(format!("{} is not set", defaults::ENV_GROQ_API_KEY)))?;

        let config = ProviderConfig {
            base_url: std::env::var(defaults::ENV_GROQ_BASE_URL)
                .unwrap_or_else(|_| defaults::PROVIDER_BASE_URL.to_string()),
            api_key,
            model: std::env::var(defaults::ENV_GROQ_MODEL)
                .unwrap_or_else(|_| defaults::PROVIDER_MODEL.to_string()),
            timeout_seconds: std::env::var(defaults::ENV_GROQ_TIMEOUT)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS),
            ..ProviderConfig::default()
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// `data:<mime>;base64,<payload>` URL for inline image transport.
    fn data_url(image: &NormalizedImage) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&image.data);
        format!("data:{};base64,{}", image.mime_type, encoded)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorResponse {
    error: ProviderError,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: String,
}

#[async_trait]
impl DiagnosisProvider for GroqVisionProvider {
    async fn submit(&self, image: &NormalizedImage, prompt: &str) -> Result<DiagnosisRaw> {
        debug!(
            model = %self.config.model,
            image_bytes = image.data.len(),
            "Submitting diagnosis request"
        );

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: Self::data_url(image),
                        },
                    },
                ],
            }],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self
            .client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::UpstreamUnavailable(format!(
                        "Vision provider timed out after {}s",
                        self.config.timeout_seconds
                    ))
                } else {
                    Error::UpstreamUnavailable(format!("Vision provider unreachable: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProviderErrorResponse>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "no error detail".to_string());
            return Err(Error::UpstreamRejected {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|_| {
            // 2xx with an undecodable envelope is the provider breaking its
            // own contract, not a transport failure.
            Error::UpstreamRejected {
                status: status.as_u16(),
                message: "unparseable completion envelope".to_string(),
            }
        })?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::UpstreamRejected {
                status: status.as_u16(),
                message: "completion contained no choices".to_string(),
            })?;

        let model = completion
            .model
            .unwrap_or_else(|| self.config.model.clone());

        debug!(response_len = text.len(), model = %model, "Diagnosis reply received");

        Ok(DiagnosisRaw { text, model })
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
