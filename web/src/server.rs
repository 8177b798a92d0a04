//! The listener loop.
//!
//! Every service binary ends in [`serve`]: bind, accept forever, hand each
//! connection to its own task, stop on Ctrl-C or SIGTERM. Hyper swallows
//! response-write failures from peers that went away, and a panicking
//! handler is turned into a 501 by the catch-panic layer, so no single bad
//! request can stop the loop.

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::middleware::correlation_id_layer;
use axum::{Router, response::IntoResponse, response::Response};
use sidecar_core::ServiceError;
use std::any::Any;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

/// Wrap a service router in the layers every service shares.
///
/// Outermost first: correlation id span, request/response tracing, panic
/// isolation.
#[must_use]
pub fn with_shell_layers(router: Router) -> Router {
    router
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .layer(correlation_id_layer())
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");

    AppError::plain(ServiceError::unclassified(format!("handler panicked: {detail}")))
        .into_response()
}

/// Bind the configured address and serve until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if the address is invalid, cannot be bound, or the
/// accept loop fails.
pub async fn serve(router: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;

    serve_on(listener, router, shutdown_signal()).await
}

/// Serve on an already-bound listener until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the accept loop fails.
pub async fn serve_on<F>(listener: TcpListener, router: Router, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, with_shell_layers(router))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!(%addr, "Listener stopped");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Unable to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Unable to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode},
        routing::get,
    };
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("kaboom")
    }

    #[tokio::test]
    async fn test_panic_maps_to_not_implemented() {
        let app = with_shell_layers(Router::new().route("/boom", get(boom)));

        let request = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"NotImplemented");
    }

    async fn get_over_tcp(addr: std::net::SocketAddr) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn test_loop_survives_dropped_connections() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let server = tokio::spawn(serve_on(listener, router, async move {
            let _ = stop_rx.await;
        }));

        // Peer sends a request and vanishes before reading the response.
        {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            let _ = stream
                .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\n\r\n")
                .await;
        }

        let response = get_over_tcp(addr).await;
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("pong"), "{response}");

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }
}
