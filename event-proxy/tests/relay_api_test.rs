//! HTTP-level tests for the relay router, with the forwarder mocked out.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use sidecar_core::ServiceError;
use sidecar_event_proxy::{EventKind, RelayEvent, router};
use sidecar_testing::{RecordingPerformer, helpers::eventually};
use std::time::Duration;
use tower::ServiceExt;

type Forwarder = RecordingPerformer<RelayEvent, ()>;

const WAIT: Duration = Duration::from_secs(2);

async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn post(path: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn occupant_joined() -> Value {
    json!({
        "event_name": "muc-occupant-joined",
        "room_name": "standup",
        "occupant": {"name": "ada", "email": "ada@example.com"},
    })
}

#[tokio::test]
async fn test_known_paths_are_relayed() {
    let cases = [
        ("/events/occupant/joined", occupant_joined(), json!({"event": "occupant joined", "username": "ada"})),
        ("/events/occupant/left", occupant_joined(), json!({"event": "occupant left", "username": "ada"})),
        ("/events/room/created", json!({"room_name": "standup"}), json!({"event": "room created", "room": "standup"})),
        ("/events/room/destroyed", json!({"room_name": "standup"}), json!({"event": "room destroyed", "room": "standup"})),
    ];

    for (path, body, expected) in cases {
        let forwarder = Forwarder::succeeding(());

        let (status, text) = send(router(forwarder.clone(), None), post(path, &body)).await;

        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(text, "ok");
        assert!(eventually(|| forwarder.call_count() == 1, WAIT).await, "{path}");
        assert_eq!(forwarder.calls()[0].payload(), expected);
    }
}

#[tokio::test]
async fn test_forward_failure_still_answers_ok() {
    let forwarder = Forwarder::failing(ServiceError::action_failed("connection refused"));

    let (status, text) = send(
        router(forwarder.clone(), None),
        post("/events/room/created", &json!({"room_name": "standup"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, "ok");
    assert!(eventually(|| forwarder.call_count() == 1, WAIT).await);
}

#[tokio::test]
async fn test_unparsable_body_is_acknowledged_and_dropped() {
    let forwarder = Forwarder::succeeding(());
    let request = Request::builder()
        .method("POST")
        .uri("/events/occupant/joined")
        .body(Body::from("not json"))
        .unwrap();

    let (status, _) = send(router(forwarder.clone(), None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(!eventually(|| forwarder.call_count() > 0, Duration::from_millis(100)).await);
}

#[tokio::test]
async fn test_missing_occupant_is_dropped() {
    let forwarder = Forwarder::succeeding(());

    let (status, _) = send(
        router(forwarder.clone(), None),
        post("/events/occupant/left", &json!({"room_name": "standup"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!eventually(|| forwarder.call_count() > 0, Duration::from_millis(100)).await);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let forwarder = Forwarder::succeeding(());

    let (status, text) = send(
        router(forwarder.clone(), None),
        post("/events/room/renamed", &json!({"room_name": "standup"})),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        serde_json::from_str::<Value>(&text).unwrap(),
        json!({"error": {"message": "Not Found"}})
    );
    assert_eq!(forwarder.call_count(), 0);
}

#[tokio::test]
async fn test_non_post_is_method_not_allowed() {
    for method in ["GET", "PUT", "DELETE"] {
        let request = Request::builder()
            .method(method)
            .uri("/events/room/created")
            .body(Body::empty())
            .unwrap();

        let (status, text) = send(router(Forwarder::succeeding(()), None), request).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"error": {"message": "Method Not Allowed"}})
        );
    }
}

#[tokio::test]
async fn test_method_is_checked_before_token() {
    let request = Request::builder()
        .method("GET")
        .uri("/events/room/created")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(
        router(Forwarder::succeeding(()), Some("hunter2".to_string())),
        request,
    )
    .await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_bearer_token_required_when_configured() {
    let forwarder = Forwarder::succeeding(());
    let app = router(forwarder.clone(), Some("hunter2".to_string()));
    let body = json!({"room_name": "standup"});

    for authorization in [None, Some("Basic hunter2"), Some("Bearer wrong"), Some("Bearer")] {
        let mut request = post("/events/room/created", &body);
        if let Some(value) = authorization {
            request
                .headers_mut()
                .insert(header::AUTHORIZATION, value.parse().unwrap());
        }

        let (status, text) = send(app.clone(), request).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "{authorization:?}");
        assert_eq!(
            serde_json::from_str::<Value>(&text).unwrap(),
            json!({"error": {"message": "Unauthorized"}})
        );
    }

    let mut request = post("/events/room/created", &body);
    request
        .headers_mut()
        .insert(header::AUTHORIZATION, "Bearer hunter2".parse().unwrap());
    let (status, _) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(eventually(|| forwarder.call_count() == 1, WAIT).await);
    assert_eq!(forwarder.calls()[0].kind, EventKind::RoomCreated);
}

#[tokio::test]
async fn test_unknown_path_still_needs_token() {
    let (status, _) = send(
        router(Forwarder::succeeding(()), Some("hunter2".to_string())),
        post("/nowhere", &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
