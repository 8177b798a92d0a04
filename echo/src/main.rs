//! Echo service binary.

use sidecar_echo::{EchoConfig, NcatProbe, router};
use sidecar_web::{config::load_dotenv, server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing("sidecar_echo=info,sidecar_web=info,tower_http=info")?;

    let config = EchoConfig::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        shell = %config.shell,
        probe_timeout_secs = config.probe_timeout.as_secs(),
        "Starting echo service"
    );

    let probe = NcatProbe::new(config.shell.clone(), config.probe_timeout);
    server::serve(router(probe), &config.server).await
}
