//! HTTP handlers.

pub mod analyze;
pub mod meta;

pub use analyze::analyze_leaf;
pub use meta::{health_check, service_info};
