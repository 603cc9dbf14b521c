// Location authorization tracking for beacon monitoring

use shared::AuthorizationState;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Remembers the last authorization the platform reported
pub struct AuthorizationTracker {
    state: Arc<RwLock<AuthorizationState>>,
}

impl AuthorizationTracker {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(AuthorizationState::NotDetermined)),
        }
    }

    pub async fn current(&self) -> AuthorizationState {
        *self.state.read().await
    }

    /// Store a newly reported state, returning the previous one
    pub async fn record(&self, state: AuthorizationState) -> AuthorizationState {
        let mut current = self.state.write().await;
        let previous = std::mem::replace(&mut *current, state);
        debug!(%previous, %state, "Location authorization updated");
        previous
    }

    /// Guidance shown when the user has turned location access off
    pub fn denial_message() -> &'static str {
        "Paying at terminals requires \"Always\" location access. \
         Please enable it for this app in your device settings."
    }
}

impl Default for AuthorizationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_starts_not_determined() {
        let tracker = AuthorizationTracker::new();
        assert_eq!(tracker.current().await, AuthorizationState::NotDetermined);
    }

    #[tokio::test]
    async fn test_record_returns_previous() {
        let tracker = AuthorizationTracker::new();

        let previous = tracker.record(AuthorizationState::AuthorizedAlways).await;
        assert_eq!(previous, AuthorizationState::NotDetermined);

        let previous = tracker.record(AuthorizationState::Denied).await;
        assert_eq!(previous, AuthorizationState::AuthorizedAlways);
    }

    #[test]
    fn test_denial_message_mentions_always_access() {
        assert!(AuthorizationTracker::denial_message().contains("\"Always\""));
    }
}
