pub mod models;
pub mod error;
pub mod config;

pub use config::{BackendConfig, BeaconConfig, Config, NotificationConfig};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use models::{amount_for, AuthorizationState, BeaconIdentity, PendingAction};
