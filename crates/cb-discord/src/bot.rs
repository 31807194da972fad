//! Discord gateway session using Serenity

use async_trait::async_trait;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::error::{DiscordError, Result};
use crate::handler::ReadyHandler;
use crate::session::SessionTracker;

/// Opens and drives a gateway connection
///
/// Resolves when the connection ends. Implementations report readiness
/// through the tracker.
#[async_trait]
pub trait GatewayConnector: Send + Sync {
    async fn connect(&self, token: &str, tracker: SessionTracker) -> Result<()>;
}

/// Connector backed by a Serenity client
#[derive(Debug, Clone, Copy, Default)]
pub struct SerenityConnector;

#[async_trait]
impl GatewayConnector for SerenityConnector {
    async fn connect(&self, token: &str, tracker: SessionTracker) -> Result<()> {
        // Guild membership is all the bridge needs to see
        let intents = GatewayIntents::GUILDS;

        let mut client = Client::builder(token, intents)
            .event_handler(ReadyHandler::new(tracker))
            .await?;

        client.start().await?;

        Ok(())
    }
}

/// The process-wide gateway session
pub struct GatewaySession {
    token: String,
    connector: Box<dyn GatewayConnector>,
    tracker: SessionTracker,
}

impl GatewaySession {
    /// Create a session with a custom connector
    pub fn new(token: impl Into<String>, connector: impl GatewayConnector + 'static) -> Self {
        Self {
            token: token.into(),
            connector: Box::new(connector),
            tracker: SessionTracker::new(),
        }
    }

    /// Create a session backed by Serenity
    pub fn serenity(token: impl Into<String>) -> Self {
        Self::new(token, SerenityConnector)
    }

    /// Handle for observing the session state
    pub fn tracker(&self) -> SessionTracker {
        self.tracker.clone()
    }

    /// Log in and drive the session until it ends
    pub async fn run(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            self.tracker
                .mark_failed(DiscordError::TokenNotSet.to_string())
                .await;
            return Err(DiscordError::TokenNotSet);
        }

        self.tracker.begin_login().await;
        info!("Logging into Discord gateway...");

        match self.connector.connect(&self.token, self.tracker.clone()).await {
            Ok(()) => {
                if self.tracker.is_ready().await {
                    info!("Discord gateway session closed");
                } else {
                    warn!("Discord gateway session closed before Ready");
                }
                Ok(())
            }
            Err(e) => {
                self.tracker.mark_failed(e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Start the login in the background.
    ///
    /// Failures are logged and never reach the caller; abort the handle to
    /// cancel the session.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(e) = self.run().await {
                let state = self.tracker.state().await;
                error!(state = %state, "Discord gateway login failed: {}", e);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionState;

    /// Connection that ends cleanly without ever sending Ready
    struct SilentConnector;

    #[async_trait]
    impl GatewayConnector for SilentConnector {
        async fn connect(&self, _token: &str, _tracker: SessionTracker) -> Result<()> {
            Ok(())
        }
    }

    /// Stand-in for the real gateway
    struct StubConnector {
        fail: bool,
    }

    #[async_trait]
    impl GatewayConnector for StubConnector {
        async fn connect(&self, _token: &str, tracker: SessionTracker) -> Result<()> {
            if self.fail {
                return Err(DiscordError::Connection("invalid token".to_string()));
            }
            tracker.mark_ready("stub#0001").await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_run_success_reaches_ready() {
        let session = GatewaySession::new("token", StubConnector { fail: false });
        let tracker = session.tracker();

        session.run().await.unwrap();

        assert_eq!(
            tracker.state().await,
            SessionState::Ready {
                user_tag: "stub#0001".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_run_closed_before_ready() {
        let session = GatewaySession::new("token", SilentConnector);
        let tracker = session.tracker();

        session.run().await.unwrap();

        assert!(!tracker.is_ready().await);
        assert_eq!(tracker.state().await, SessionState::Authenticating);
    }

    #[tokio::test]
    async fn test_run_failure_marks_failed() {
        let session = GatewaySession::new("token", StubConnector { fail: true });
        let tracker = session.tracker();

        let err = session.run().await.unwrap_err();
        assert!(matches!(err, DiscordError::Connection(_)));

        match tracker.state().await {
            SessionState::Failed { reason } => assert!(reason.contains("invalid token")),
            other => panic!("unexpected state: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_token_fails_without_connecting() {
        let session = GatewaySession::new("  ", StubConnector { fail: false });
        let tracker = session.tracker();

        assert!(matches!(session.run().await, Err(DiscordError::TokenNotSet)));
        assert!(matches!(tracker.state().await, SessionState::Failed { .. }));
    }

    #[tokio::test]
    async fn test_spawn_swallows_failure() {
        let session = GatewaySession::new("token", StubConnector { fail: true });
        let tracker = session.tracker();

        // The task completes normally even though the login failed
        session.spawn().await.unwrap();

        assert!(matches!(tracker.state().await, SessionState::Failed { .. }));
    }
}
