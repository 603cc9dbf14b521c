use notification::NotificationRecord;
use serde::{Deserialize, Serialize};
use shared::{amount_for, BeaconIdentity, ErrorKind};
use uuid::Uuid;

use crate::{ProximityError, Result};

/// Region as reported by the platform in enter/exit callbacks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDescriptor {
    pub identifier: String,
    pub kind: RegionKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    Beacon {
        proximity_uuid: Uuid,
        major: Option<u16>,
        minor: Option<u16>,
    },
    /// Any non-beacon region (geofence etc.)
    Other,
}

impl RegionDescriptor {
    pub fn beacon(identity: &BeaconIdentity) -> Self {
        Self {
            identifier: identity.region_identifier(),
            kind: RegionKind::Beacon {
                proximity_uuid: identity.vendor_id,
                major: Some(identity.major),
                minor: Some(identity.minor),
            },
        }
    }

    /// Major and minor of a beacon region.
    ///
    /// `Ok(None)` for non-beacon regions; an error when a beacon region lacks either field.
    pub fn beacon_numbers(&self) -> Result<Option<(u16, u16)>> {
        match &self.kind {
            RegionKind::Other => Ok(None),
            RegionKind::Beacon { major, minor, .. } => match (major, minor) {
                (Some(major), Some(minor)) => Ok(Some((*major, *minor))),
                (None, _) => Err(self.invalid("missing major")),
                (_, None) => Err(self.invalid("missing minor")),
            },
        }
    }

    fn invalid(&self, reason: &str) -> ProximityError {
        ProximityError::InvalidRegion {
            identifier: self.identifier.clone(),
            reason: reason.to_string(),
        }
    }
}

/// A beacon region registered with the monitoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredRegion {
    pub identifier: String,
    pub beacon: BeaconIdentity,
    pub notify_entry_state_on_display: bool,
}

impl MonitoredRegion {
    pub fn for_terminal(beacon: BeaconIdentity) -> Self {
        Self {
            identifier: beacon.region_identifier(),
            beacon,
            notify_entry_state_on_display: true,
        }
    }
}

/// Events raised by the proximity monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    MonitoringChanged { enabled: bool },
    RegionEntered(BeaconIdentity),
    RegionExited(BeaconIdentity),
}

/// Where the router sent a detected beacon
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    DeliveredToForeground,
    Scheduled(NotificationRecord),
    NoMatchingAction,
    /// The attempt ended with a logged failure
    Dropped(ErrorKind),
}

/// What the foreground UI shows for a terminal, derived from the beacon alone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalPrompt {
    pub terminal_label: String,
    pub amount_label: String,
}

impl TerminalPrompt {
    pub fn from_beacon(beacon: &BeaconIdentity, currency: &str) -> Self {
        Self {
            terminal_label: format!("Terminal {}", beacon.minor),
            amount_label: format!("{} {}", amount_for(beacon), currency),
        }
    }
}
