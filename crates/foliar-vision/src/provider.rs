//! Diagnosis provider trait.

use async_trait::async_trait;
use foliar_core::{DiagnosisRaw, NormalizedImage, Result};

/// Capability interface over the external vision model.
///
/// One `submit` is exactly one outbound call with a bounded timeout. No
/// retries happen inside an implementation: a diagnosis call is paid and
/// non-idempotent, so silent retries would duplicate cost and can return a
/// different answer. Retry policy, if any, belongs to the caller.
#[async_trait]
pub trait DiagnosisProvider: Send + Sync {
    /// Send the image plus instruction prompt and return the raw reply.
    async fn submit(&self, image: &NormalizedImage, prompt: &str) -> Result<DiagnosisRaw>;

    /// The model name this provider is configured to use.
    fn model_name(&self) -> &str;
}
