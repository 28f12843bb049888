//! poise-server binary

use std::sync::Arc;

use poise_core::PoiseError;
use poise_runtime::{serve_with_shutdown, telemetry, AppState, ServerConfig};
use poise_vision::NoopDetector;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), PoiseError> {
    let config = ServerConfig::from_env()?;
    telemetry::init(config.log_format)?;

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| PoiseError::TransportError(format!("bind {}: {}", config.bind_addr, e)))?;

    // No landmark model is bundled; every frame reports nothing detected.
    warn!("no landmark detector configured, using NoopDetector");
    let state = AppState::new(config, Arc::new(NoopDetector));

    serve_with_shutdown(listener, state, async {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
        }
    })
    .await
}
