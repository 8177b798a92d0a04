//! Axum shell for the sidecar services.
//!
//! The pure pipeline (record → validate → perform → dispatch) lives in
//! `sidecar-core`. This crate wraps it in HTTP:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Imperative Shell (Axum)        │  ← listener loop, extractors
//! │  - Method / path gates                  │  ← correlation ids, tracing
//! │  - AppError → canonical response        │  ← catch-panic → 501
//! ├─────────────────────────────────────────┤
//! │          sidecar-core                   │
//! │  - RequestRecord, validators            │
//! │  - ServiceError, Reply                  │
//! │  - ActionPerformer seam                 │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::post};
//! use sidecar_web::{AppError, JsonRecord, server};
//!
//! async fn handle(JsonRecord(record): JsonRecord) -> Result<String, AppError> {
//!     let input = validate(&record)?;
//!     Ok(perform(input).await?)
//! }
//!
//! let app = Router::new().route("/api", post(handle));
//! server::serve(app, &config).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod telemetry;

// Re-export key types for convenience
pub use config::ServerConfig;
pub use error::AppError;
pub use extractors::{ForwardedFor, JsonRecord, QueryRecord};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};
