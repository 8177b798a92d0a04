//! Event relay binary.

use sidecar_event_proxy::{EventProxyConfig, HttpForwarder, router};
use sidecar_web::{config::load_dotenv, server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing("sidecar_event_proxy=info,sidecar_web=info,tower_http=info")?;

    let config = EventProxyConfig::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        auth = config.token.is_some(),
        forward_timeout_secs = config.forward_timeout.as_secs(),
        "Starting event proxy"
    );

    let forwarder = HttpForwarder::new(config.endpoints.clone(), config.forward_timeout)?;
    server::serve(router(forwarder, config.token.clone()), &config.server).await
}
