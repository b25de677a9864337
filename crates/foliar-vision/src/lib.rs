//! # foliar-vision
//!
//! Vision provider abstraction for foliar.
//!
//! This crate provides:
//! - The [`DiagnosisProvider`] capability trait
//! - The Groq (OpenAI-compatible) vision implementation
//! - The fixed analysis instruction prompt
//! - The lenient reply → [`foliar_core::AnalysisResult`] mapper
//!
//! # Feature Flags
//!
//! - `mock`: Enable the canned-reply [`mock::MockProvider`] for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use foliar_vision::{DiagnosisProvider, GroqVisionProvider, ANALYSIS_PROMPT};
//!
//! #[tokio::main]
//! async fn main() {
//!     let provider = GroqVisionProvider::from_env().unwrap();
//!     let image = foliar_core::NormalizedImage {
//!         data: std::fs::read("leaf.jpg").unwrap(),
//!         mime_type: "image/jpeg".to_string(),
//!         width: 640,
//!         height: 480,
//!     };
//!     let raw = provider.submit(&image, ANALYSIS_PROMPT).await.unwrap();
//!     let result = foliar_vision::map_reply(&raw);
//!     println!("{}", result.disease_name);
//! }
//! ```

pub mod groq;
pub mod parser;
pub mod prompt;
pub mod provider;

// Mock provider for tests (also available to dependents via the `mock`
// feature)
#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use groq::GroqVisionProvider;
pub use parser::map_reply;
pub use prompt::ANALYSIS_PROMPT;
pub use provider::DiagnosisProvider;
