//! Error types for web handlers.
//!
//! Bridges `sidecar_core::ServiceError` to HTTP. The classified error picks the
//! status; the body is always the canonical one for its kind, so internal
//! messages only ever reach the logs.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use sidecar_core::{BodyStyle, ErrorKind, Reply, ServiceError};
use std::fmt;

/// Application error type for web handlers.
///
/// Wraps a [`ServiceError`] together with the body style of the service that
/// produced it. Implements Axum's `IntoResponse`.
///
/// # Examples
///
/// ```ignore
/// async fn handler(QueryRecord(record): QueryRecord) -> Result<&'static str, AppError> {
///     let input = validate(&record)?; // ServiceError converts via `?`
///     Ok("ok")
/// }
/// ```
#[derive(Debug)]
pub struct AppError {
    error: ServiceError,
    style: BodyStyle,
}

impl AppError {
    /// Create an application error with an explicit body style.
    #[must_use]
    pub const fn new(error: ServiceError, style: BodyStyle) -> Self {
        Self { error, style }
    }

    /// Error rendered as a bare canonical word.
    #[must_use]
    pub const fn plain(error: ServiceError) -> Self {
        Self::new(error, BodyStyle::Plain)
    }

    /// Error rendered as `{"error":{"message":...}}`.
    #[must_use]
    pub const fn json(error: ServiceError) -> Self {
        Self::new(error, BodyStyle::Json)
    }

    /// Switch the body style.
    #[must_use]
    pub const fn with_style(mut self, style: BodyStyle) -> Self {
        self.style = style;
        self
    }

    /// The wrapped error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// The wrapped error.
    #[must_use]
    pub const fn service_error(&self) -> &ServiceError {
        &self.error
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

impl From<ServiceError> for AppError {
    fn from(error: ServiceError) -> Self {
        Self::plain(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let reply = Reply::from_error(&self.error, self.style);

        if reply.status >= 500 {
            tracing::error!(
                status = reply.status,
                kind = %self.error.kind(),
                message = %self.error.message(),
                "Request failed"
            );
        } else {
            tracing::debug!(
                status = reply.status,
                kind = %self.error.kind(),
                message = %self.error.message(),
                "Request rejected"
            );
        }

        HttpReply(reply).into_response()
    }
}

/// A dispatched [`Reply`] written as an HTTP response.
#[derive(Debug, Clone)]
pub struct HttpReply(pub Reply);

impl IntoResponse for HttpReply {
    fn into_response(self) -> Response {
        let Reply {
            status,
            body,
            content_type,
        } = self.0;

        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, body).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(content_type.as_str()),
        );
        response
    }
}
