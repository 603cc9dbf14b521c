use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Beacon models

/// Identity of one physical payment terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeaconIdentity {
    pub vendor_id: Uuid,
    pub major: u16,
    pub minor: u16,
}

impl BeaconIdentity {
    pub fn new(vendor_id: Uuid, major: u16, minor: u16) -> Self {
        Self {
            vendor_id,
            major,
            minor,
        }
    }

    /// Stable identifier used when registering the region for this terminal
    pub fn region_identifier(&self) -> String {
        format!("region{}", self.minor)
    }
}

impl std::fmt::Display for BeaconIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} major: {} minor: {}", self.vendor_id, self.major, self.minor)
    }
}

/// Amount charged at a terminal, derived from the beacon alone.
///
/// Both the foreground prompt and the background notification use this, so the
/// two paths always show the same figure.
pub fn amount_for(identity: &BeaconIdentity) -> Decimal {
    Decimal::new(i64::from(identity.major) * 100, 2)
}

// Authorization models

/// Location authorization as reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorizationState {
    NotDetermined,
    Denied,
    RestrictedOrDenied,
    AuthorizedForeground,
    AuthorizedAlways,
}

impl AuthorizationState {
    /// Whether region monitoring may run in this state
    pub fn allows_monitoring(&self) -> bool {
        matches!(
            self,
            AuthorizationState::AuthorizedAlways | AuthorizationState::AuthorizedForeground
        )
    }

    pub fn is_denied(&self) -> bool {
        matches!(
            self,
            AuthorizationState::Denied | AuthorizationState::RestrictedOrDenied
        )
    }
}

impl std::fmt::Display for AuthorizationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthorizationState::NotDetermined => write!(f, "NotDetermined"),
            AuthorizationState::Denied => write!(f, "Denied"),
            AuthorizationState::RestrictedOrDenied => write!(f, "RestrictedOrDenied"),
            AuthorizationState::AuthorizedForeground => write!(f, "AuthorizedForeground"),
            AuthorizationState::AuthorizedAlways => write!(f, "AuthorizedAlways"),
        }
    }
}

// Action models

/// A server-issued action waiting for the user's decision.
///
/// Lives only as long as the notification that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingAction {
    pub action_id: String,
    pub beacon: BeaconIdentity,
    pub created_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn new(action_id: impl Into<String>, beacon: BeaconIdentity) -> Self {
        Self {
            action_id: action_id.into(),
            beacon,
            created_at: Utc::now(),
        }
    }
}
