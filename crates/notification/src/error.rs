use backend::BackendError;
use shared::ErrorKind;
use thiserror::Error;

use crate::responder::InteractionState;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Not authorized to show notifications")]
    NotAuthorized,

    #[error("Notification submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Notification metadata missing or malformed: {0}")]
    MissingMetadata(String),

    #[error("Invalid interaction transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: InteractionState,
        to: InteractionState,
    },

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for NotificationError {
    fn from(err: serde_json::Error) -> Self {
        NotificationError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NotificationError>;

impl NotificationError {
    /// Message shown in the notification surface when an interaction fails
    pub fn user_message(&self) -> String {
        match self {
            NotificationError::Backend(err) => err.user_message(),
            NotificationError::NotAuthorized => {
                "Notifications are disabled. Please enable them in your device settings."
                    .to_string()
            }
            NotificationError::MissingMetadata(_) => {
                "This payment request is no longer valid. Please approach the terminal again."
                    .to_string()
            }
            other => format!("An internal error occurred: {}", other),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::NotAuthorized => ErrorKind::NotificationNotAuthorized,
            NotificationError::Backend(err) => err.kind(),
            NotificationError::InvalidAction(_) => ErrorKind::NoMatchingAction,
            NotificationError::MissingMetadata(_) | NotificationError::InvalidTransition { .. } => {
                ErrorKind::InvalidInput
            }
            NotificationError::SubmissionFailed(_) | NotificationError::Platform(_) => {
                ErrorKind::Platform
            }
            NotificationError::SerializationError(_) => ErrorKind::Internal,
        }
    }
}
