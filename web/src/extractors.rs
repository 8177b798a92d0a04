//! Custom Axum extractors.
//!
//! This module contains the input extractors shared by the services:
//! - `QueryRecord`: the query string as a [`RequestRecord`] (or `None` when the
//!   URI has no query at all)
//! - `JsonRecord`: a JSON object body as a [`RequestRecord`]
//! - `ForwardedFor`: the raw `X-Forwarded-For` header
//!
//! # Examples
//!
//! ```ignore
//! async fn handler(
//!     forwarded: ForwardedFor,
//!     QueryRecord(query): QueryRecord,
//! ) -> Result<&'static str, AppError> {
//!     tracing::info!(remote = ?forwarded.0, "Processing request");
//!     Ok("ok")
//! }
//! ```

use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use sidecar_core::{RequestRecord, ServiceError};

/// Header carrying the caller address behind a reverse proxy.
pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// Raw `X-Forwarded-For` header value.
///
/// `None` when the header is absent or not valid UTF-8. The value is passed
/// through untouched; services validate it themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedFor(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for ForwardedFor
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string);

        Ok(Self(value))
    }
}

/// Query string as a request record.
///
/// `None` means the URI carries no `?` at all, which lets a validator report
/// "no query string" in its own order.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord(pub Option<RequestRecord>);

#[async_trait]
impl<S> FromRequestParts<S> for QueryRecord
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.uri.query() {
            Some(query) => Ok(Self(Some(RequestRecord::from_query(query)?))),
            None => Ok(Self(None)),
        }
    }
}

/// JSON object body as a request record.
///
/// # Rejections
///
/// - unreadable or malformed body, or a `null` body → `Unclassified` (501)
/// - well-formed JSON that is not an object → `BadRequest` (400)
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRecord(pub RequestRecord);

#[async_trait]
impl<S> FromRequest<S> for JsonRecord
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServiceError::unclassified(format!("unreadable body: {e}")))?;

        let value: serde_json::Value = serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::unclassified(format!("malformed JSON body: {e}")))?;

        Ok(Self(RequestRecord::from_json(value)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;
    use sidecar_core::ErrorKind;

    #[tokio::test]
    async fn test_forwarded_for_is_raw() {
        let req = axum::http::Request::builder()
            .header(FORWARDED_FOR_HEADER, "203.0.113.1")
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let forwarded = ForwardedFor::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(forwarded.0.as_deref(), Some("203.0.113.1"));
    }

    #[tokio::test]
    async fn test_forwarded_for_missing() {
        let req = axum::http::Request::builder().body(()).expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let forwarded = ForwardedFor::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(forwarded.0, None);
    }

    #[tokio::test]
    async fn test_query_record_present() {
        let req = axum::http::Request::builder()
            .uri("/?proto=tcp&text=hello+world")
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let QueryRecord(record) = QueryRecord::from_request_parts(&mut parts, &()).await.unwrap();
        let record = record.expect("query present");

        assert_eq!(record.get_str("proto"), Some("tcp"));
        assert_eq!(record.get_str("text"), Some("hello world"));
    }

    #[tokio::test]
    async fn test_query_record_absent() {
        let req = axum::http::Request::builder()
            .uri("/probe")
            .body(())
            .expect("Valid request");

        let (mut parts, ()) = req.into_parts();
        let QueryRecord(record) = QueryRecord::from_request_parts(&mut parts, &()).await.unwrap();

        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_json_record_object() {
        let req = axum::http::Request::builder()
            .body(Body::from(r#"{"secret":"s3cret!","exp":60}"#))
            .expect("Valid request");

        let JsonRecord(record) = JsonRecord::from_request(req, &()).await.unwrap();

        assert_eq!(record.get_str("secret"), Some("s3cret!"));
    }

    #[tokio::test]
    async fn test_json_record_malformed_is_unclassified() {
        let req = axum::http::Request::builder()
            .body(Body::from("{not json"))
            .expect("Valid request");

        let err = JsonRecord::from_request(req, &()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unclassified);
    }

    #[tokio::test]
    async fn test_json_record_array_is_bad_request() {
        let req = axum::http::Request::builder()
            .body(Body::from("[1,2,3]"))
            .expect("Valid request");

        let err = JsonRecord::from_request(req, &()).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
