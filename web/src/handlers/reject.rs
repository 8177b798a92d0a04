//! Gate rejections.
//!
//! Used as route fallbacks: a single-purpose endpoint answers anything it
//! does not serve with one of these.

use crate::error::AppError;
use axum::http::{Method, Uri};
use sidecar_core::ServiceError;

/// 403 `Forbidden` (plain body).
///
/// # Endpoint
///
/// ```text
/// <any method> <any path not served>
/// ```
#[allow(clippy::unused_async)]
pub async fn forbidden(method: Method, uri: Uri) -> AppError {
    AppError::plain(ServiceError::forbidden(format!("{method} {uri} is not served")))
}

/// 404 `{"error":{"message":"Not Found"}}`.
#[allow(clippy::unused_async)]
pub async fn not_found_json(uri: Uri) -> AppError {
    AppError::json(ServiceError::not_found(format!("no route for {}", uri.path())))
}

/// 405 `{"error":{"message":"Method Not Allowed"}}`.
#[allow(clippy::unused_async)]
pub async fn method_not_allowed_json(method: Method) -> AppError {
    AppError::json(ServiceError::method_not_allowed(format!(
        "{method} is not allowed"
    )))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_forbidden_fallback() {
        let app = Router::new().fallback(forbidden);

        let request = Request::builder()
            .method("DELETE")
            .uri("/anything")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Forbidden");
    }

    #[tokio::test]
    async fn test_not_found_json() {
        let response = axum::response::IntoResponse::into_response(
            not_found_json(Uri::from_static("/events/unknown")).await,
        );

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":{"message":"Not Found"}}"#);
    }

    #[tokio::test]
    async fn test_method_not_allowed_json() {
        let response =
            axum::response::IntoResponse::into_response(method_not_allowed_json(Method::GET).await);

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":{"message":"Method Not Allowed"}}"#);
    }
}
