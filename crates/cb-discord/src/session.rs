//! Gateway session state tracking

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Lifecycle of the gateway session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nothing attempted yet
    #[default]
    Unauthenticated,
    /// Login in flight, waiting for the Ready event
    Authenticating,
    /// Ready received; the tag of the authenticated bot user
    Ready { user_tag: String },
    /// Login or session failed; terminal for the session, not the process
    Failed { reason: String },
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "unauthenticated"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Ready { user_tag } => write!(f, "ready ({})", user_tag),
            Self::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Shared handle over the session state
///
/// Cloning is cheap; every clone observes the same state.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    state: Arc<RwLock<SessionState>>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state snapshot
    pub async fn state(&self) -> SessionState {
        self.state.read().await.clone()
    }

    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.read().await, SessionState::Ready { .. })
    }

    /// Unauthenticated -> Authenticating
    pub async fn begin_login(&self) -> bool {
        let mut state = self.state.write().await;
        if *state != SessionState::Unauthenticated {
            return false;
        }
        *state = SessionState::Authenticating;
        true
    }

    /// Authenticating -> Ready.
    ///
    /// Returns `true` only for the first Ready; later ones (reconnects) are
    /// ignored.
    pub async fn mark_ready(&self, user_tag: impl Into<String>) -> bool {
        let mut state = self.state.write().await;
        if *state != SessionState::Authenticating {
            return false;
        }
        *state = SessionState::Ready {
            user_tag: user_tag.into(),
        };
        true
    }

    /// Any live state -> Failed. A session that already failed keeps its
    /// first reason.
    pub async fn mark_failed(&self, reason: impl Into<String>) -> bool {
        let mut state = self.state.write().await;
        if matches!(*state, SessionState::Failed { .. }) {
            return false;
        }
        *state = SessionState::Failed {
            reason: reason.into(),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_happy_path() {
        let tracker = SessionTracker::new();
        assert_eq!(tracker.state().await, SessionState::Unauthenticated);

        assert!(tracker.begin_login().await);
        assert_eq!(tracker.state().await, SessionState::Authenticating);

        assert!(tracker.mark_ready("bridge#0001").await);
        assert!(tracker.is_ready().await);
        assert_eq!(
            tracker.state().await,
            SessionState::Ready {
                user_tag: "bridge#0001".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_ready_only_once() {
        let tracker = SessionTracker::new();
        tracker.begin_login().await;

        assert!(tracker.mark_ready("first#0001").await);
        assert!(!tracker.mark_ready("second#0002").await);
        assert_eq!(
            tracker.state().await,
            SessionState::Ready {
                user_tag: "first#0001".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_ready_requires_login() {
        let tracker = SessionTracker::new();
        assert!(!tracker.mark_ready("early#0001").await);
        assert!(!tracker.is_ready().await);
    }

    #[tokio::test]
    async fn test_begin_login_once() {
        let tracker = SessionTracker::new();
        assert!(tracker.begin_login().await);
        assert!(!tracker.begin_login().await);
    }

    #[tokio::test]
    async fn test_failed_is_terminal() {
        let tracker = SessionTracker::new();
        tracker.begin_login().await;

        assert!(tracker.mark_failed("invalid token").await);
        assert!(!tracker.mark_failed("again").await);
        assert!(!tracker.mark_ready("late#0001").await);
        assert!(!tracker.begin_login().await);
        assert_eq!(
            tracker.state().await,
            SessionState::Failed {
                reason: "invalid token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let tracker = SessionTracker::new();
        let other = tracker.clone();
        tracker.begin_login().await;
        assert_eq!(other.state().await, SessionState::Authenticating);
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionState::Authenticating.to_string(), "authenticating");
        assert_eq!(
            SessionState::Failed {
                reason: "boom".to_string()
            }
            .to_string(),
            "failed: boom"
        );
    }
}
