use backend::BackendError;
use notification::NotificationError;
use shared::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProximityError {
    #[error("Location authorization denied: {0}")]
    AuthorizationDenied(String),

    #[error("Invalid beacon region {identifier}: {reason}")]
    InvalidRegion { identifier: String, reason: String },

    #[error("Region monitoring error: {0}")]
    Platform(String),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),
}

pub type Result<T> = std::result::Result<T, ProximityError>;

impl ProximityError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProximityError::AuthorizationDenied(_) => ErrorKind::AuthorizationDenied,
            ProximityError::InvalidRegion { .. } => ErrorKind::InvalidInput,
            ProximityError::Platform(_) => ErrorKind::Platform,
            ProximityError::Backend(err) => err.kind(),
            ProximityError::Notification(err) => err.kind(),
        }
    }
}
