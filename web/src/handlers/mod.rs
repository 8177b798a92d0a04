//! HTTP request handlers.
//!
//! Gate handlers shared by the services live here; endpoint handlers live in
//! each service crate.

pub mod reject;

// Re-export common handler utilities
pub use reject::{forbidden, method_not_allowed_json, not_found_json};
