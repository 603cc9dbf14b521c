use shared::ErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Action lookup failed: {0}")]
    LookupFailed(String),

    #[error("Action failed: {0}")]
    ActionFailed(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, BackendError>;

impl BackendError {
    /// Message suitable for showing in the notification surface
    pub fn user_message(&self) -> String {
        match self {
            BackendError::ActionFailed(reason) => reason.clone(),
            BackendError::LookupFailed(reason) => {
                format!("Could not reach the terminal: {}", reason)
            }
            BackendError::Http(err) if err.is_timeout() => {
                "The request timed out. Please try again at the terminal.".to_string()
            }
            BackendError::Http(_) => {
                "Network error. Please check your connection and try again.".to_string()
            }
            BackendError::UnexpectedResponse(_) | BackendError::InvalidConfig(_) => {
                "An internal error occurred. Please try again.".to_string()
            }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::LookupFailed(_) => ErrorKind::BackendLookupFailed,
            BackendError::ActionFailed(_) => ErrorKind::BackendActionFailed,
            BackendError::Http(_) | BackendError::UnexpectedResponse(_) => ErrorKind::Platform,
            BackendError::InvalidConfig(_) => ErrorKind::InvalidInput,
        }
    }
}
