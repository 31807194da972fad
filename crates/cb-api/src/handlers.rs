//! HTTP API handlers

use axum::{Json, extract::State};
use tracing::debug;

use cb_core::{InteractionPayload, InteractionResponse, respond};

use crate::server::AppState;

/// Health check endpoint
pub async fn health() -> &'static str {
    "OK"
}

/// Placeholder for a future OAuth / linked-role verification flow
pub async fn verify_user() -> &'static str {
    "OK"
}

/// Interactions endpoint
///
/// Runs behind the signature middleware, so the payload here is trusted.
pub async fn interactions(
    State(state): State<AppState>,
    Json(payload): Json<InteractionPayload>,
) -> Json<InteractionResponse> {
    debug!(
        interaction_type = ?payload.interaction_type(),
        command = payload.command_name().unwrap_or("-"),
        "Received interaction"
    );

    Json(respond(&payload, &state.reply_content))
}
