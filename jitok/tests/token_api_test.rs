//! HTTP-level tests for the token router.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Value, json};
use sidecar_core::ServiceError;
use sidecar_jitok::{Claims, HmacSigner, TokenRequest, router};
use sidecar_testing::{RecordingPerformer, test_clock};
use tower::ServiceExt;

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn post(path: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

fn post_json(path: &str, body: &Value) -> Request<Body> {
    post(path, body.to_string())
}

fn app() -> Router {
    router(HmacSigner::new(test_clock()))
}

fn decode(token: &str, secret: &str, alg: Algorithm, aud: &str) -> Claims {
    let mut validation = Validation::new(alg);
    validation.set_audience(&[aud]);
    validation.validate_exp = false;
    validation.validate_nbf = false;

    jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .expect("token verifies")
        .claims
}

#[tokio::test]
async fn test_minimal_request_returns_token() {
    let (status, token) = send(app(), post_json("/api", &json!({"secret": "s3cret!", "aud": "app1"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(token.split('.').count(), 3);
    assert!(token.split('.').all(|part| !part.is_empty()));

    let claims = decode(&token, "s3cret!", Algorithm::HS256, "app1");
    assert_eq!(claims.iss, "app1");
    assert_eq!(claims.sub, "*");
    assert_eq!(claims.room, "*");
    assert!(claims.context.is_none());
}

#[tokio::test]
async fn test_full_request() {
    let body = json!({
        "secret": "s3cret!",
        "aud": "app1",
        "iss": "backend",
        "sub": "meet.example.com",
        "room": "standup",
        "nbf": 60,
        "exp": 120,
        "alg": "HS512",
        "cntx_user_name": "Ada",
        "cntx_user_email": "ada@example.com",
        "cntx_feat_rec": true,
        "cntx_feat_live": 0,
    });

    let (status, token) = send(app(), post_json("/api/token", &body)).await;

    assert_eq!(status, StatusCode::OK);
    let claims = decode(&token, "s3cret!", Algorithm::HS512, "app1");
    let iat = test_clock_secs();
    assert_eq!(claims.iss, "backend");
    assert_eq!(claims.sub, "meet.example.com");
    assert_eq!(claims.room, "standup");
    assert_eq!(claims.nbf, iat + 60);
    assert_eq!(claims.exp, iat + 120);

    let context = serde_json::to_value(claims.context.unwrap()).unwrap();
    assert_eq!(
        context,
        json!({
            "user": {"name": "Ada", "email": "ada@example.com"},
            "features": {"recording": true, "livestreaming": false},
        })
    );
}

fn test_clock_secs() -> i64 {
    use sidecar_core::environment::Clock;
    test_clock().now().timestamp()
}

#[tokio::test]
async fn test_invalid_field_is_bad_request() {
    for body in [
        json!({"aud": "app1"}),
        json!({"secret": "s3cret!"}),
        json!({"secret": "s3cret!", "aud": "app 1"}),
        json!({"secret": "s3cret!", "aud": "app1", "room": "a/b"}),
        json!({"secret": "s3cret!", "aud": "app1", "exp": "3600"}),
        json!({"secret": "s3cret!", "aud": "app1", "alg": "none"}),
    ] {
        let (status, text) = send(app(), post_json("/api", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(text, "BadRequest");
    }
}

#[tokio::test]
async fn test_non_object_body_is_bad_request() {
    let (status, _) = send(app(), post("/api", "[1, 2, 3]")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_null_body_is_not_implemented() {
    let (status, text) = send(app(), post("/api", "null")).await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(text, "NotImplemented");
}

#[tokio::test]
async fn test_malformed_body_is_not_implemented() {
    let (status, text) = send(app(), post("/api", "{\"secret\": ")).await;

    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(text, "NotImplemented");
}

#[tokio::test]
async fn test_wrong_method_or_path_is_forbidden() {
    let body = json!({"secret": "s3cret!", "aud": "app1"});

    let (status, text) = send(app(), post_json("/token", &body)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(text, "Forbidden");

    let get = Request::builder().uri("/api").body(Body::empty()).unwrap();
    let (status, _) = send(app(), get).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signing_failure_is_internal_server_error() {
    let signer = RecordingPerformer::<TokenRequest, String>::failing(ServiceError::action_failed(
        "cannot sign token",
    ));

    let (status, text) = send(
        router(signer.clone()),
        post_json("/api", &json!({"secret": "s3cret!", "aud": "app1"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(text, "InternalServerError");
    assert_eq!(signer.call_count(), 1);
}

#[tokio::test]
async fn test_invalid_request_never_reaches_signer() {
    let signer = RecordingPerformer::<TokenRequest, String>::succeeding("token".to_string());

    let (status, _) = send(router(signer.clone()), post_json("/api", &json!({"aud": "app1"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(signer.call_count(), 0);
}
