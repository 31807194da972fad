//! Serenity event handler for the gateway session

use serenity::async_trait;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tracing::{debug, info};

use crate::session::SessionTracker;

/// Records readiness on the session tracker and logs the bot identity
pub struct ReadyHandler {
    tracker: SessionTracker,
}

impl ReadyHandler {
    pub fn new(tracker: SessionTracker) -> Self {
        Self { tracker }
    }

    pub(crate) async fn on_ready(&self, user_tag: String) {
        if self.tracker.mark_ready(user_tag.clone()).await {
            info!("Logged in as {}", user_tag);
        } else {
            debug!(user = %user_tag, "Ignoring repeated Ready event");
        }
    }
}

#[async_trait]
impl EventHandler for ReadyHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        self.on_ready(ready.user.tag()).await;
    }
}
