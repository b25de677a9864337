//! # foliar-core
//!
//! Core types, errors, and configuration for the foliar leaf-disease
//! diagnosis service.
//!
//! This crate provides the data model shared by the vision-provider and
//! HTTP layers: the canonical [`AnalysisResult`] entity with its closed
//! [`Confidence`] and [`Severity`] enums, the per-request transport
//! structs, the error taxonomy, and the immutable startup configuration.

pub mod config;
pub mod defaults;
pub mod error;
pub mod models;

// Re-export commonly used types at crate root
pub use config::{AppConfig, ImagePolicy, ProviderConfig, ServerConfig, UploadPolicy};
pub use error::{Error, Result};
pub use models::{AnalysisResult, Confidence, DiagnosisRaw, NormalizedImage, Severity, UploadedFile};
