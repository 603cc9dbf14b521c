use serde::Deserialize;
use std::env;
use std::ops::RangeInclusive;
use std::time::Duration;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::BeaconIdentity;

pub const DEFAULT_PROXIMITY_UUID: Uuid = Uuid::from_bytes([
    0x33, 0x01, 0x3f, 0x7f, 0xcb, 0x46, 0x4d, 0xb6, 0xb4, 0xbe, 0x54, 0x2c, 0x31, 0x0a, 0x81, 0xeb,
]);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub beacon: BeaconConfig,
    pub backend: BackendConfig,
    pub notification: NotificationConfig,
}

/// Beacon deployment the app listens for. Must match the terminals' setup.
#[derive(Debug, Clone, Deserialize)]
pub struct BeaconConfig {
    pub proximity_uuid: Uuid,
    pub major: u16,
    /// First monitored minor, inclusive
    pub minor_first: u16,
    /// Last monitored minor, inclusive
    pub minor_last: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    /// Delay between the final visual state and dismissal (default: 1000)
    pub dismiss_delay_ms: u64,
    pub currency: String,
}

impl BeaconConfig {
    pub fn minor_range(&self) -> RangeInclusive<u16> {
        self.minor_first..=self.minor_last
    }

    /// One identity per terminal in the configured range
    pub fn terminals(&self) -> impl Iterator<Item = BeaconIdentity> + '_ {
        self.minor_range()
            .map(move |minor| BeaconIdentity::new(self.proximity_uuid, self.major, minor))
    }

    pub fn identity_for(&self, major: u16, minor: u16) -> BeaconIdentity {
        BeaconIdentity::new(self.proximity_uuid, major, minor)
    }
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            proximity_uuid: DEFAULT_PROXIMITY_UUID,
            major: 204,
            minor_first: 1,
            minor_last: 20,
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

impl NotificationConfig {
    pub fn dismiss_delay(&self) -> Duration {
        Duration::from_millis(self.dismiss_delay_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            dismiss_delay_ms: 1000,
            currency: "CHF".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            beacon: BeaconConfig::default(),
            backend: BackendConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let config = Config {
            beacon: BeaconConfig {
                proximity_uuid: env::var("BEACON_PROXIMITY_UUID")
                    .unwrap_or_else(|_| DEFAULT_PROXIMITY_UUID.to_string())
                    .parse()?,
                major: env::var("BEACON_MAJOR")
                    .unwrap_or_else(|_| "204".to_string())
                    .parse()?,
                minor_first: env::var("BEACON_MINOR_FIRST")
                    .unwrap_or_else(|_| "1".to_string())
                    .parse()?,
                minor_last: env::var("BEACON_MINOR_LAST")
                    .unwrap_or_else(|_| "20".to_string())
                    .parse()?,
            },
            backend: BackendConfig {
                base_url: env::var("BACKEND_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8080".to_string()),
                timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()?,
            },
            notification: NotificationConfig {
                dismiss_delay_ms: env::var("NOTIFICATION_DISMISS_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()?,
                currency: env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "CHF".to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.beacon.minor_first == 0 {
            return Err(Error::Validation(
                "minor range must start at 1 or above".to_string(),
            ));
        }
        if self.beacon.minor_first > self.beacon.minor_last {
            return Err(Error::Validation(format!(
                "empty minor range: {}..={}",
                self.beacon.minor_first, self.beacon.minor_last
            )));
        }
        if self.backend.base_url.trim().is_empty() {
            return Err(Error::Config("backend base url is empty".to_string()));
        }
        Ok(())
    }
}
