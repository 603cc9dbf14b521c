// Platform boundary for local notifications
// The host adapter implements NotificationCenter on top of the OS notification service

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{NotificationCategory, NotificationError, NotificationRecord, Result};

/// Whether the user allows this app to post notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationAuthorization {
    NotDetermined,
    Denied,
    Authorized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            alert: true,
            sound: true,
        }
    }
}

/// Trait for the platform's local notification service
#[async_trait]
pub trait NotificationCenter: Send + Sync {
    /// Current notification settings
    async fn authorization_status(&self) -> NotificationAuthorization;

    /// Show the OS permission prompt; resolves with whether it was granted
    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool>;

    /// Declare the actionable categories notifications may use
    async fn set_categories(&self, categories: Vec<NotificationCategory>) -> Result<()>;

    /// Submit a notification for immediate delivery
    async fn add(&self, record: &NotificationRecord) -> Result<()>;
}

/// Notification center that keeps everything in memory.
///
/// Used by tests and by hosts without a notification service.
pub struct InMemoryNotificationCenter {
    status: RwLock<NotificationAuthorization>,
    grant_on_request: bool,
    fail_submissions: bool,
    categories: RwLock<Vec<NotificationCategory>>,
    delivered: RwLock<Vec<NotificationRecord>>,
}

impl InMemoryNotificationCenter {
    pub fn new(status: NotificationAuthorization) -> Self {
        Self {
            status: RwLock::new(status),
            grant_on_request: true,
            fail_submissions: false,
            categories: RwLock::new(Vec::new()),
            delivered: RwLock::new(Vec::new()),
        }
    }

    pub fn authorized() -> Self {
        Self::new(NotificationAuthorization::Authorized)
    }

    /// Permission prompts will be declined
    pub fn denying_requests(mut self) -> Self {
        self.grant_on_request = false;
        self
    }

    /// Every submission fails as if the OS rejected it
    pub fn failing_submissions(mut self) -> Self {
        self.fail_submissions = true;
        self
    }

    pub async fn set_status(&self, status: NotificationAuthorization) {
        *self.status.write().await = status;
    }

    pub async fn delivered(&self) -> Vec<NotificationRecord> {
        self.delivered.read().await.clone()
    }

    pub async fn categories(&self) -> Vec<NotificationCategory> {
        self.categories.read().await.clone()
    }
}

#[async_trait]
impl NotificationCenter for InMemoryNotificationCenter {
    async fn authorization_status(&self) -> NotificationAuthorization {
        *self.status.read().await
    }

    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool> {
        let mut status = self.status.write().await;
        if *status == NotificationAuthorization::NotDetermined {
            *status = if self.grant_on_request {
                NotificationAuthorization::Authorized
            } else {
                NotificationAuthorization::Denied
            };
        }
        debug!(?options, status = ?*status, "Notification authorization requested");
        Ok(*status == NotificationAuthorization::Authorized)
    }

    async fn set_categories(&self, categories: Vec<NotificationCategory>) -> Result<()> {
        *self.categories.write().await = categories;
        Ok(())
    }

    async fn add(&self, record: &NotificationRecord) -> Result<()> {
        if self.fail_submissions {
            return Err(NotificationError::Platform(
                "notification service unavailable".to_string(),
            ));
        }
        info!(notification_id = %record.id, title = %record.title, "Notification delivered");
        self.delivered.write().await.push(record.clone());
        Ok(())
    }
}
