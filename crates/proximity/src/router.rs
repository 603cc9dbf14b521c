// Routing of detected terminals to the foreground UI or a background notification

use backend::BackendClient;
use notification::{NotificationError, NotificationScheduler};
use shared::{BeaconIdentity, ErrorContext};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{ProximityError, RouteOutcome};

/// Receives terminals detected while the app is frontmost
pub type ForegroundObserver = Arc<dyn Fn(BeaconIdentity) + Send + Sync>;

/// Decides, per detected beacon, whether the foreground UI handles it directly
/// or a payment notification is scheduled.
///
/// Every failure is logged and ends the attempt; re-entering the region retries.
pub struct ProximityRouter {
    backend: Arc<dyn BackendClient>,
    scheduler: Arc<NotificationScheduler>,
    foreground: RwLock<Option<ForegroundObserver>>,
}

impl ProximityRouter {
    pub fn new(backend: Arc<dyn BackendClient>, scheduler: Arc<NotificationScheduler>) -> Self {
        Self {
            backend,
            scheduler,
            foreground: RwLock::new(None),
        }
    }

    /// Replaces any previously registered observer
    pub async fn set_foreground_observer<F>(&self, observer: F)
    where
        F: Fn(BeaconIdentity) + Send + Sync + 'static,
    {
        *self.foreground.write().await = Some(Arc::new(observer));
        debug!("Foreground observer registered");
    }

    pub async fn clear_foreground_observer(&self) {
        *self.foreground.write().await = None;
        debug!("Foreground observer cleared");
    }

    pub async fn route(&self, beacon: BeaconIdentity, app_is_foreground: bool) -> RouteOutcome {
        if app_is_foreground {
            let observer = self.foreground.read().await.clone();
            if let Some(observer) = observer {
                info!(beacon = %beacon, "Delivering terminal to foreground UI");
                observer(beacon);
                return RouteOutcome::DeliveredToForeground;
            }
            debug!(beacon = %beacon, "No foreground observer, falling back to notification");
        }

        let action_id = match self.backend.lookup_action(&beacon).await {
            Ok(Some(action_id)) if !action_id.is_empty() => action_id,
            Ok(_) => {
                info!(beacon = %beacon, "No pending action for terminal");
                return RouteOutcome::NoMatchingAction;
            }
            Err(e) => {
                let err = ProximityError::from(e);
                ErrorContext::new()
                    .with_beacon(beacon)
                    .with_info("action lookup")
                    .log(&err, err.kind());
                return RouteOutcome::Dropped(err.kind());
            }
        };

        debug!(beacon = %beacon, action_id = %action_id, "Backend resolved pending action");

        match self.scheduler.schedule(beacon, &action_id).await {
            Ok(record) => RouteOutcome::Scheduled(record),
            // Already logged by the scheduler
            Err(
                e @ (NotificationError::NotAuthorized | NotificationError::SubmissionFailed(_)),
            ) => RouteOutcome::Dropped(e.kind()),
            Err(e) => {
                let err = ProximityError::from(e);
                ErrorContext::new()
                    .with_beacon(beacon)
                    .with_action_id(action_id)
                    .log(&err, err.kind());
                RouteOutcome::Dropped(err.kind())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend::MockBackendClient;
    use notification::{InMemoryNotificationCenter, NotificationAuthorization};
    use shared::{ErrorKind, NotificationConfig};
    use std::sync::Mutex;
    use uuid::Uuid;

    fn router(
        backend: Arc<MockBackendClient>,
        center: Arc<InMemoryNotificationCenter>,
    ) -> ProximityRouter {
        let scheduler = Arc::new(NotificationScheduler::new(
            center,
            &NotificationConfig::default(),
        ));
        ProximityRouter::new(backend, scheduler)
    }

    fn terminal(minor: u16) -> BeaconIdentity {
        BeaconIdentity::new(Uuid::new_v4(), 204, minor)
    }

    #[tokio::test]
    async fn test_foreground_skips_backend() {
        let backend = Arc::new(MockBackendClient::new().with_action("abc123"));
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        router
            .set_foreground_observer(move |beacon| sink.lock().unwrap().push(beacon))
            .await;
        let beacon = terminal(7);

        let outcome = router.route(beacon, true).await;

        assert_eq!(outcome, RouteOutcome::DeliveredToForeground);
        assert_eq!(*seen.lock().unwrap(), vec![beacon]);
        assert!(backend.lookup_calls().await.is_empty());
        assert!(center.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn test_foreground_without_observer_uses_notification() {
        let backend = Arc::new(MockBackendClient::new().with_action("abc123"));
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center.clone());

        let outcome = router.route(terminal(7), true).await;

        assert!(matches!(outcome, RouteOutcome::Scheduled(_)));
        assert_eq!(backend.lookup_calls().await.len(), 1);
    }

    #[tokio::test]
    async fn test_cleared_observer_is_not_called() {
        let backend = Arc::new(MockBackendClient::new());
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center);
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        router
            .set_foreground_observer(move |_| *sink.lock().unwrap() += 1)
            .await;
        router.clear_foreground_observer().await;

        let outcome = router.route(terminal(7), true).await;

        assert_eq!(outcome, RouteOutcome::NoMatchingAction);
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_background_schedules_found_action() {
        let backend = Arc::new(MockBackendClient::new().with_action("abc123"));
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center.clone());
        let beacon = terminal(7);

        let outcome = router.route(beacon, false).await;

        let record = match outcome {
            RouteOutcome::Scheduled(record) => record,
            other => panic!("Expected Scheduled, got {:?}", other),
        };
        assert_eq!(record.metadata["actionId"], "abc123");
        assert_eq!(backend.lookup_calls().await, vec![beacon]);
        assert_eq!(center.delivered().await.len(), 1);
    }

    #[tokio::test]
    async fn test_no_action_schedules_nothing() {
        let backend = Arc::new(MockBackendClient::new());
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center.clone());

        let outcome = router.route(terminal(7), false).await;

        assert_eq!(outcome, RouteOutcome::NoMatchingAction);
        assert!(center.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn test_lookup_failure_is_dropped() {
        let backend = Arc::new(MockBackendClient::new().with_failing_lookup("timeout"));
        let center = Arc::new(InMemoryNotificationCenter::authorized());
        let router = router(backend.clone(), center.clone());

        let outcome = router.route(terminal(7), false).await;

        assert_eq!(outcome, RouteOutcome::Dropped(ErrorKind::BackendLookupFailed));
        assert_eq!(backend.lookup_calls().await.len(), 1);
        assert!(center.delivered().await.is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_notifications_are_dropped() {
        let backend = Arc::new(MockBackendClient::new().with_action("abc123"));
        let center = Arc::new(InMemoryNotificationCenter::new(NotificationAuthorization::Denied));
        let router = router(backend, center.clone());

        let outcome = router.route(terminal(7), false).await;

        assert_eq!(
            outcome,
            RouteOutcome::Dropped(ErrorKind::NotificationNotAuthorized)
        );
        assert!(center.delivered().await.is_empty());
    }
}
