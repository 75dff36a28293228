//! Liveness endpoint.
//!
//! A single `GET /healthz` route so a hosting platform can tell the process
//! is up. Nothing else is routed.

use anyhow::{Context, Result};
use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

pub const LIVENESS_BODY: &str = "✅ Bot WhatsApp Aktif";

pub fn create_router() -> Router {
    Router::new().route("/healthz", get(handle_healthz))
}

/// GET /healthz: process liveness
async fn handle_healthz() -> (StatusCode, &'static str) {
    (StatusCode::OK, LIVENESS_BODY)
}

/// Bind the liveness listener on `host:port`.
pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind liveness endpoint on {host}:{port}"))?;
    let addr = listener.local_addr()?;
    tracing::info!("🌐 Liveness endpoint on http://{addr}/healthz");
    Ok(listener)
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
pub async fn run_gateway(host: &str, port: u16, shutdown: CancellationToken) -> Result<()> {
    serve(bind(host, port).await?, shutdown).await
}

pub async fn serve(listener: TcpListener, shutdown: CancellationToken) -> Result<()> {
    axum::serve(listener, create_router())
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("Liveness endpoint failed")
}
