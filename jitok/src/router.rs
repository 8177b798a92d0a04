//! HTTP surface of the token service.
//!
//! `POST` to any path under `/api` mints a token; everything else is
//! `403 Forbidden`.

use crate::input::{self, TokenRequest};
use axum::{
    Router,
    extract::State,
    http::{Method, Uri},
};
use sidecar_core::{ActionPerformer, Reply};
use sidecar_web::{AppError, JsonRecord, error::HttpReply, handlers};
use std::sync::Arc;

/// Path prefix served by the token endpoint.
pub const API_PREFIX: &str = "/api";

/// Build the token router around a signer.
pub fn router<S>(signer: S) -> Router
where
    S: ActionPerformer<TokenRequest, Output = String> + 'static,
{
    Router::new()
        .fallback(trigger_token::<S>)
        .with_state(Arc::new(signer))
}

/// Validate the claim fields and answer with the signed token.
///
/// # Endpoint
///
/// ```text
/// POST /api[...]
/// Content-Type: application/json
///
/// {"secret": "...", "aud": "...", "room": "...", "exp": 3600, ...}
/// ```
async fn trigger_token<S>(
    State(signer): State<Arc<S>>,
    method: Method,
    uri: Uri,
    body: Result<JsonRecord, AppError>,
) -> Result<HttpReply, AppError>
where
    S: ActionPerformer<TokenRequest, Output = String> + 'static,
{
    if method != Method::POST || !uri.path().starts_with(API_PREFIX) {
        return Err(handlers::forbidden(method, uri).await);
    }

    let JsonRecord(record) = body?;
    let request = input::validate(&record)?;

    tracing::info!(
        aud = %request.aud,
        room = request.room.as_deref().unwrap_or("*"),
        alg = ?request.alg,
        "Token requested"
    );

    let token = signer.perform(request).await?;

    Ok(HttpReply(Reply::ok(token)))
}
