//! Poise Runtime - HTTP and WebSocket server
//!
//! Hosts the frame analyzer and the signaling relay behind one axum
//! router:
//! - `GET /health`, `GET /questions`, `POST /analyze`
//! - `GET /ws/:user_id` for signaling and live frame feedback

pub mod config;
pub mod protocol;
pub mod routes;
pub mod session;
pub mod state;
pub mod telemetry;

pub use config::*;
pub use protocol::*;
pub use routes::{router, ApiError};
pub use state::*;

use std::future::Future;

use poise_core::{PoiseError, PoiseResult};
use tokio::net::TcpListener;
use tracing::info;

/// Serve until the listener fails
pub async fn serve(listener: TcpListener, state: AppState) -> PoiseResult<()> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves
pub async fn serve_with_shutdown<F>(
    listener: TcpListener,
    state: AppState,
    shutdown: F,
) -> PoiseResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener
        .local_addr()
        .map_err(|e| PoiseError::TransportError(e.to_string()))?;
    info!("Poise server listening on {}", local);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| PoiseError::TransportError(e.to_string()))
}
