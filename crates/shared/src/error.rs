use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::models::BeaconIdentity;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failure kinds shared by every crate in the workspace.
///
/// None of them is retried; each one ends the current interaction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    AuthorizationDenied,
    NotificationNotAuthorized,
    BackendLookupFailed,
    BackendActionFailed,
    NoMatchingAction,
    InvalidInput,
    Platform,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::AuthorizationDenied => write!(f, "authorization_denied"),
            ErrorKind::NotificationNotAuthorized => write!(f, "notification_not_authorized"),
            ErrorKind::BackendLookupFailed => write!(f, "backend_lookup_failed"),
            ErrorKind::BackendActionFailed => write!(f, "backend_action_failed"),
            ErrorKind::NoMatchingAction => write!(f, "no_matching_action"),
            ErrorKind::InvalidInput => write!(f, "invalid_input"),
            ErrorKind::Platform => write!(f, "platform"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// Context for error logging
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    pub beacon: Option<BeaconIdentity>,
    pub action_id: Option<String>,
    pub notification_id: Option<Uuid>,
    pub additional_info: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_beacon(mut self, beacon: BeaconIdentity) -> Self {
        self.beacon = Some(beacon);
        self
    }

    pub fn with_action_id(mut self, action_id: impl Into<String>) -> Self {
        self.action_id = Some(action_id.into());
        self
    }

    pub fn with_notification_id(mut self, notification_id: Uuid) -> Self {
        self.notification_id = Some(notification_id);
        self
    }

    pub fn with_info(mut self, info: impl Into<String>) -> Self {
        self.additional_info = Some(info.into());
        self
    }

    /// Emit one structured record for `err`, tagged with its kind
    pub fn log(&self, err: &dyn std::error::Error, kind: ErrorKind) {
        error!(
            error = %err,
            kind = %kind,
            beacon = ?self.beacon,
            action_id = ?self.action_id,
            notification_id = ?self.notification_id,
            additional_info = ?self.additional_info,
            timestamp = %chrono::Utc::now(),
            "Payment trigger error occurred"
        );
    }
}
