//! Token service binary.

use sidecar_core::environment::SystemClock;
use sidecar_jitok::{HmacSigner, JitokConfig, router};
use sidecar_web::{config::load_dotenv, server, telemetry::init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    init_tracing("sidecar_jitok=info,sidecar_web=info,tower_http=info")?;

    let config = JitokConfig::from_env();
    tracing::info!(
        host = %config.server.host,
        port = config.server.port,
        "Starting token service"
    );

    server::serve(router(HmacSigner::new(SystemClock)), &config.server).await
}
