//! HTTP surface of the event relay.
//!
//! Gates run in this order, each answering with a JSON error body:
//!
//! 1. method: anything but `POST` → 405
//! 2. bearer token, when one is configured → 401
//! 3. path: one of the four event paths, otherwise → 404
//!
//! A request that passes all three is answered `200 ok` at once; parsing and
//! forwarding continue on a detached task and their failures are only logged.

use crate::event::{EventKind, RelayEvent};
use axum::{
    Router,
    body::Bytes,
    extract::{Request, State, rejection::BytesRejection},
    http::{Method, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use sidecar_core::{ActionPerformer, BodyStyle, Reply};
use sidecar_web::{AppError, error::HttpReply, handlers, middleware::bearer_auth_layer};
use std::sync::Arc;
use tracing::Instrument;

/// Build the relay router around a forwarder.
///
/// `token` enables bearer authentication when `Some` and non-empty.
pub fn router<F>(forwarder: F, token: Option<String>) -> Router
where
    F: ActionPerformer<RelayEvent, Output = ()> + 'static,
{
    Router::new()
        .fallback(accept_event::<F>)
        .with_state(Arc::new(forwarder))
        .layer(bearer_auth_layer(token, BodyStyle::Json))
        .layer(middleware::from_fn(require_post))
}

async fn require_post(request: Request, next: Next) -> Response {
    if request.method() == Method::POST {
        next.run(request).await
    } else {
        handlers::method_not_allowed_json(request.method().clone())
            .await
            .into_response()
    }
}

/// Acknowledge a known event and relay it in the background.
///
/// # Endpoint
///
/// ```text
/// POST /events/occupant/joined | /events/occupant/left
///    | /events/room/created    | /events/room/destroyed
/// ```
async fn accept_event<F>(
    State(forwarder): State<Arc<F>>,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<HttpReply, AppError>
where
    F: ActionPerformer<RelayEvent, Output = ()> + 'static,
{
    let Some(kind) = EventKind::from_path(uri.path()) else {
        return Err(handlers::not_found_json(uri).await);
    };

    match body {
        Ok(body) => {
            tokio::spawn(relay(forwarder, kind, body).in_current_span());
        }
        Err(e) => tracing::warn!(%kind, error = %e, "Dropping event with unreadable body"),
    }

    Ok(HttpReply(Reply::ok("ok")))
}

async fn relay<F>(forwarder: Arc<F>, kind: EventKind, body: Bytes)
where
    F: ActionPerformer<RelayEvent, Output = ()>,
{
    let event = match RelayEvent::from_body(kind, &body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(%kind, error = %e, "Dropping event");
            return;
        }
    };

    if let Err(e) = forwarder.perform(event).await {
        tracing::error!(%kind, error = %e, "Event forwarding failed");
    }
}
