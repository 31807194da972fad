//! Process wiring: HTTP server plus gateway session

use std::future::Future;
use std::net::{Ipv4Addr, SocketAddr};

use anyhow::Context;
use cb_api::AppState;
use cb_core::Config;
use cb_discord::GatewaySession;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Listener address: all interfaces on the configured port
pub fn bind_addr(config: &Config) -> SocketAddr {
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.api.port))
}

/// Serve interactions on `listener` while the gateway session runs alongside.
///
/// The gateway login is fire-and-forget: its failure is logged by the session
/// task and never stops the HTTP server. The task is aborted once `shutdown`
/// resolves and the server has drained.
pub async fn run_bridge<F>(
    config: &Config,
    session: GatewaySession,
    listener: TcpListener,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = AppState::from_config(config).context("Invalid DISCORD_PUBLIC_KEY")?;

    let gateway = session.spawn();

    let port = listener.local_addr()?.port();
    info!("HTTP server listening on http://localhost:{}", port);

    let result = cb_api::serve(listener, state, shutdown).await;
    gateway.abort();

    result.context("HTTP server error")
}

/// Resolves on Ctrl+C
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down...");
}
