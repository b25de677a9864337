//! Mock diagnosis provider for deterministic testing.
//!
//! Returns canned replies without any network access and records every
//! call, so tests can assert both reply handling and that short-circuited
//! requests never reach the provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use foliar_core::{DiagnosisRaw, Error, NormalizedImage, Result};

use crate::provider::DiagnosisProvider;

/// What the mock should do when `submit` is called.
#[derive(Debug, Clone)]
enum MockBehavior {
    Reply(String),
    Unavailable(String),
    Rejected { status: u16, message: String },
}

/// Mock provider with a builder-style API.
#[derive(Clone)]
pub struct MockProvider {
    behavior: MockBehavior,
    model: String,
    calls: Arc<AtomicUsize>,
}

impl MockProvider {
    /// Create a mock answering with the given reply text.
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Reply(reply.into()),
            model: "mock-vision-model".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that fails as if the provider were unreachable.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Unavailable(message.into()),
            model: "mock-vision-model".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a mock that fails as if the provider rejected the call.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self {
            behavior: MockBehavior::Rejected {
                status,
                message: message.into(),
            },
            model: "mock-vision-model".to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Override the reported model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Number of `submit` calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiagnosisProvider for MockProvider {
    async fn submit(&self, _image: &NormalizedImage, _prompt: &str) -> Result<DiagnosisRaw> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Reply(text) => Ok(DiagnosisRaw {
                text: text.clone(),
                model: self.model.clone(),
            }),
            MockBehavior::Unavailable(message) => Err(Error::UpstreamUnavailable(message.clone())),
            MockBehavior::Rejected { status, message } => Err(Error::UpstreamRejected {
                status: *status,
                message: message.clone(),
            }),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image() -> NormalizedImage {
        NormalizedImage {
            data: vec![1, 2, 3],
            mime_type: "image/png".to_string(),
            width: 1,
            height: 1,
        }
    }

    #[tokio::test]
    async fn test_mock_returns_canned_reply() {
        let mock = MockProvider::with_reply("{\"disease_name\":\"x\"}").with_model("m1");
        let raw = mock.submit(&image(), "prompt").await.unwrap();
        assert_eq!(raw.text, "{\"disease_name\":\"x\"}");
        assert_eq!(raw.model, "m1");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_failure_modes() {
        let mock = MockProvider::unavailable("down");
        assert!(matches!(
            mock.submit(&image(), "p").await.unwrap_err(),
            Error::UpstreamUnavailable(_)
        ));

        let mock = MockProvider::rejected(429, "quota");
        match mock.submit(&image(), "p").await.unwrap_err() {
            Error::UpstreamRejected { status, .. } => assert_eq!(status, 429),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_call_count_shared_across_clones() {
        let mock = MockProvider::with_reply("ok");
        let clone = mock.clone();
        clone.submit(&image(), "p").await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
