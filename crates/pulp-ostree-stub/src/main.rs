//! Standalone Pulp ostree stub server.
//!
//! `PULP_STUB_PORT` selects the port (default 8080). When both
//! `PULP_STUB_USERNAME` and `PULP_STUB_PASSWORD` are set, every API route
//! except `/pulp/api/v3/status/` requires those basic-auth credentials.

use std::net::SocketAddr;

use anyhow::Context;
use pulp_ostree_stub::{router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = match std::env::var("PULP_STUB_PORT") {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("PULP_STUB_PORT is not a valid port: {raw:?}"))?,
        Err(_) => 8080,
    };

    let state = match (
        std::env::var("PULP_STUB_USERNAME").ok(),
        std::env::var("PULP_STUB_PASSWORD").ok(),
    ) {
        (Some(username), Some(password)) => {
            tracing::info!(%username, "basic auth enabled");
            AppState::with_credentials(username, password)
        }
        (None, None) => AppState::new(),
        _ => anyhow::bail!("PULP_STUB_USERNAME and PULP_STUB_PASSWORD must be set together"),
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("pulp-ostree-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, router(state).into_make_service())
        .await
        .context("server error")?;
    Ok(())
}
