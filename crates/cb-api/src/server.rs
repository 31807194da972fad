//! HTTP API Server
//!
//! Starts and manages the axum-based HTTP server.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use cb_core::Config;

use crate::error::Result;
use crate::middleware::signature::SignatureVerifier;
use crate::routes::routes;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub reply_content: Arc<str>,
    pub verifier: Arc<SignatureVerifier>,
}

impl AppState {
    /// Build state from configuration, failing on an unusable public key
    pub fn from_config(config: &Config) -> Result<Self> {
        let verifier = SignatureVerifier::from_hex(&config.public_key)?;

        Ok(Self {
            reply_content: Arc::from(config.reply_content.as_str()),
            verifier: Arc::new(verifier),
        })
    }
}

/// Assemble the router with all routes and the request trace layer
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes(&state))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
