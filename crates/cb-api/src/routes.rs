//! Route definitions

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::handlers::{health, interactions, verify_user};
use crate::middleware::signature::verify_signature;
use crate::server::AppState;

/// Create the API router
pub fn routes(state: &AppState) -> Router<AppState> {
    // Only the webhook is signed; the GET routes are open
    let signed = Router::new()
        .route("/api/interactions", post(interactions))
        .route_layer(middleware::from_fn_with_state(
            state.verifier.clone(),
            verify_signature,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/verify-user", get(verify_user))
        .merge(signed)
}
