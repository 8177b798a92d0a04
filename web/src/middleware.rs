//! Tower middleware shared by the services.
//!
//! - **Correlation ID tracking**: extract or generate a correlation id, run the
//!   request inside an `http_request` span, echo the id back on the response
//! - **Bearer authentication**: optional shared-token gate answering 401
//!
//! # Example
//!
//! ```ignore
//! use sidecar_web::middleware::{bearer_auth_layer, correlation_id_layer};
//!
//! let app = Router::new()
//!     .route("/events/room/created", post(handler))
//!     .layer(bearer_auth_layer(config.token.clone(), BodyStyle::Json))
//!     .layer(correlation_id_layer());
//! ```

use crate::error::AppError;
use axum::{
    extract::Request,
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq;
use sidecar_core::{BodyStyle, ServiceError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

type BoxFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Create a layer that adds correlation ID tracking to all requests.
///
/// This layer:
/// - Extracts correlation ID from request header or generates new UUID
/// - Stores correlation ID in request extensions
/// - Creates tracing span with `correlation_id` field
/// - Injects correlation ID into response header
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Copy, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request) -> Self::Future {
        let correlation_id = req
            .headers()
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        req.extensions_mut().insert(correlation_id);

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            uri = %req.uri(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Ok(header_value) = HeaderValue::from_str(&correlation_id.to_string()) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}

/// Create a layer that requires `Authorization: Bearer <token>`.
///
/// With `token = None` every request passes through. Rejections are rendered
/// as 401 in the given body style.
#[must_use]
pub fn bearer_auth_layer(token: Option<String>, style: BodyStyle) -> BearerAuthLayer {
    BearerAuthLayer {
        token: token.filter(|t| !t.is_empty()).map(Arc::from),
        style,
    }
}

/// Layer for bearer-token authentication.
#[derive(Clone, Debug)]
pub struct BearerAuthLayer {
    token: Option<Arc<str>>,
    style: BodyStyle,
}

impl<S> Layer<S> for BearerAuthLayer {
    type Service = BearerAuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        BearerAuthMiddleware {
            inner,
            token: self.token.clone(),
            style: self.style,
        }
    }
}

/// Middleware service for bearer-token authentication.
#[derive(Clone, Debug)]
pub struct BearerAuthMiddleware<S> {
    inner: S,
    token: Option<Arc<str>>,
    style: BodyStyle,
}

impl<S> Service<Request> for BearerAuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if let Some(expected) = &self.token {
            let authorization = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            if let Err(error) = check_bearer(authorization, expected) {
                let response = AppError::new(error, self.style).into_response();
                return Box::pin(async move { Ok(response) });
            }
        }

        Box::pin(self.inner.call(req))
    }
}

/// Check an `Authorization` header value against the expected token.
///
/// The scheme must be exactly `Bearer` and the second space-separated part
/// must equal the token.
///
/// # Errors
///
/// Returns `Unauthorized` naming what was wrong.
pub fn check_bearer(authorization: Option<&str>, expected: &str) -> Result<(), ServiceError> {
    let authorization =
        authorization.ok_or_else(|| ServiceError::unauthorized("missing authorization header"))?;

    let mut parts = authorization.split(' ');
    if parts.next() != Some("Bearer") {
        return Err(ServiceError::unauthorized("authorization scheme is not Bearer"));
    }

    let presented = parts.next().unwrap_or_default();
    if constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
        Ok(())
    } else {
        Err(ServiceError::unauthorized("bearer token mismatch"))
    }
}
