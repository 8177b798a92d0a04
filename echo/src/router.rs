//! HTTP surface of the echo service.
//!
//! Every path is served. `GET` runs the probe pipeline; any other method is
//! answered `403 Forbidden`.

use crate::input::{self, EchoInput};
use axum::{
    Router,
    extract::State,
    http::{Method, Uri},
};
use sidecar_core::{ActionPerformer, Reply};
use sidecar_web::{AppError, ForwardedFor, QueryRecord, error::HttpReply, handlers};
use std::sync::Arc;

/// Build the echo router around a probe.
pub fn router<P>(probe: P) -> Router
where
    P: ActionPerformer<EchoInput, Output = ()> + 'static,
{
    Router::new()
        .fallback(trigger_echo::<P>)
        .with_state(Arc::new(probe))
}

/// Validate the probe request, run the probe, answer `ok`.
///
/// # Endpoint
///
/// ```text
/// GET <any path>?proto=tcp|udp&port=<20..65535>&text=<words>
/// X-Forwarded-For: <caller ipv4>
/// ```
async fn trigger_echo<P>(
    State(probe): State<Arc<P>>,
    method: Method,
    uri: Uri,
    ForwardedFor(forwarded_for): ForwardedFor,
    query: Result<QueryRecord, AppError>,
) -> Result<HttpReply, AppError>
where
    P: ActionPerformer<EchoInput, Output = ()> + 'static,
{
    if method != Method::GET {
        return Err(handlers::forbidden(method, uri).await);
    }

    let QueryRecord(query) = query?;
    let input = input::validate(query.as_ref(), forwarded_for.as_deref())?;

    tracing::info!(
        addr = %input.addr,
        port = input.port,
        proto = %input.proto,
        "Echo requested"
    );

    probe.perform(input).await?;

    Ok(HttpReply(Reply::ok("ok")))
}
