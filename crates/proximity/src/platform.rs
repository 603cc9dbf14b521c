// Platform abstraction for beacon region monitoring
// The host adapter implements RegionMonitoringService on top of the OS location service

use async_trait::async_trait;
use shared::AuthorizationState;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{MonitoredRegion, ProximityError, Result};

/// Trait for the platform's region monitoring service
#[async_trait]
pub trait RegionMonitoringService: Send + Sync {
    /// Current location authorization
    async fn authorization_status(&self) -> AuthorizationState;

    /// Show the "always" location prompt.
    ///
    /// The answer arrives later through the host's authorization-changed callback.
    async fn request_always_authorization(&self) -> Result<()>;

    /// Regions currently registered with the service
    async fn monitored_regions(&self) -> Vec<MonitoredRegion>;

    /// Register a region; an existing region with the same identifier is replaced
    async fn start_monitoring(&self, region: MonitoredRegion) -> Result<()>;

    async fn stop_monitoring(&self, identifier: &str) -> Result<()>;
}

/// Region service that keeps registrations in memory, keyed by region identifier.
///
/// Used by tests and by hosts without location services.
pub struct InMemoryRegionService {
    status: RwLock<AuthorizationState>,
    regions: RwLock<BTreeMap<String, MonitoredRegion>>,
    prompts: RwLock<u32>,
    fail_after: Option<usize>,
}

impl InMemoryRegionService {
    pub fn new(status: AuthorizationState) -> Self {
        Self {
            status: RwLock::new(status),
            regions: RwLock::new(BTreeMap::new()),
            prompts: RwLock::new(0),
            fail_after: None,
        }
    }

    /// Every registration fails as if the OS rejected it
    pub fn failing_registrations(self) -> Self {
        self.failing_after(0)
    }

    /// Registrations fail once `limit` regions are monitored
    pub fn failing_after(mut self, limit: usize) -> Self {
        self.fail_after = Some(limit);
        self
    }

    pub async fn set_status(&self, status: AuthorizationState) {
        *self.status.write().await = status;
    }

    /// Number of authorization prompts shown so far
    pub async fn prompt_count(&self) -> u32 {
        *self.prompts.read().await
    }
}

impl Default for InMemoryRegionService {
    fn default() -> Self {
        Self::new(AuthorizationState::NotDetermined)
    }
}

#[async_trait]
impl RegionMonitoringService for InMemoryRegionService {
    async fn authorization_status(&self) -> AuthorizationState {
        *self.status.read().await
    }

    async fn request_always_authorization(&self) -> Result<()> {
        *self.prompts.write().await += 1;
        info!("Location authorization prompt shown");
        Ok(())
    }

    async fn monitored_regions(&self) -> Vec<MonitoredRegion> {
        self.regions.read().await.values().cloned().collect()
    }

    async fn start_monitoring(&self, region: MonitoredRegion) -> Result<()> {
        let mut regions = self.regions.write().await;
        if self.fail_after.is_some_and(|limit| regions.len() >= limit) {
            return Err(ProximityError::Platform(format!(
                "monitoring unavailable for {}",
                region.identifier
            )));
        }
        debug!(identifier = %region.identifier, "Monitoring region");
        regions.insert(region.identifier.clone(), region);
        Ok(())
    }

    async fn stop_monitoring(&self, identifier: &str) -> Result<()> {
        debug!(identifier, "Stopped monitoring region");
        self.regions.write().await.remove(identifier);
        Ok(())
    }
}
