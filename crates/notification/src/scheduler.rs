use shared::{BeaconIdentity, ErrorContext, NotificationConfig, PendingAction};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    AuthorizationOptions, NotificationAuthorization, NotificationCategory, NotificationCenter,
    NotificationError, NotificationRecord, Result,
};

/// Turns pending actions into local notifications
pub struct NotificationScheduler {
    center: Arc<dyn NotificationCenter>,
    currency: String,
}

impl NotificationScheduler {
    pub fn new(center: Arc<dyn NotificationCenter>, config: &NotificationConfig) -> Self {
        Self {
            center,
            currency: config.currency.clone(),
        }
    }

    /// Declare the payment category. Call once at start-up.
    pub async fn register_categories(&self) -> Result<()> {
        self.center
            .set_categories(vec![NotificationCategory::payment()])
            .await?;
        info!("Registered payment notification category");
        Ok(())
    }

    /// Ask the user for alert and sound permission
    pub async fn request_authorization(&self) -> Result<bool> {
        let granted = self
            .center
            .request_authorization(AuthorizationOptions::default())
            .await?;
        info!(granted, "Notification authorization result");
        Ok(granted)
    }

    /// Post a notification for `action_id` found at `beacon`.
    ///
    /// Every call posts a new notification; repeated calls for the same terminal
    /// are not coalesced.
    pub async fn schedule(
        &self,
        beacon: BeaconIdentity,
        action_id: &str,
    ) -> Result<NotificationRecord> {
        if action_id.is_empty() {
            return Err(NotificationError::InvalidAction("empty action id".to_string()));
        }

        if self.center.authorization_status().await != NotificationAuthorization::Authorized {
            info!(beacon = %beacon, "Not authorized to show notification");
            return Err(NotificationError::NotAuthorized);
        }

        let action = PendingAction::new(action_id, beacon);
        let record = NotificationRecord::for_action(&action, &self.currency)?;

        if let Err(e) = self.center.add(&record).await {
            let err = NotificationError::SubmissionFailed(e.to_string());
            ErrorContext::new()
                .with_beacon(beacon)
                .with_action_id(action_id)
                .with_notification_id(record.id)
                .log(&err, err.kind());
            warn!(notification_id = %record.id, "Dropping undelivered notification");
            return Err(err);
        }

        info!(
            notification_id = %record.id,
            action_id,
            minor = beacon.minor,
            "Scheduled payment notification"
        );
        Ok(record)
    }
}
