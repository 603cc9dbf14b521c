// Beacon region monitoring kept in sync with location authorization

use shared::{AuthorizationState, BeaconConfig, BeaconIdentity, ErrorContext};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{
    AuthorizationTracker, MonitorEvent, MonitoredRegion, ProximityError, RegionDescriptor,
    RegionMonitoringService, Result,
};

/// Callback invoked for every monitor event
pub type EventHandler = Arc<dyn Fn(&MonitorEvent) + Send + Sync>;

/// Owns the set of watched terminal regions and raises enter/exit events.
///
/// Region set mutations happen only in [`ProximityMonitor::on_authorization_changed`];
/// the host delivers those callbacks one at a time.
pub struct ProximityMonitor {
    service: Arc<dyn RegionMonitoringService>,
    beacons: BeaconConfig,
    authorization: AuthorizationTracker,
    handlers: RwLock<Vec<EventHandler>>,
}

impl ProximityMonitor {
    pub fn new(service: Arc<dyn RegionMonitoringService>, beacons: BeaconConfig) -> Self {
        Self {
            service,
            beacons,
            authorization: AuthorizationTracker::new(),
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Register an observer for monitoring changes and region transitions
    pub async fn on_event<F>(&self, handler: F)
    where
        F: Fn(&MonitorEvent) + Send + Sync + 'static,
    {
        self.handlers.write().await.push(Arc::new(handler));
    }

    /// Ask for "always" location access. The outcome arrives via
    /// [`ProximityMonitor::on_authorization_changed`].
    pub async fn request_authorization(&self) -> Result<()> {
        info!("Requesting always location authorization");
        self.service.request_always_authorization().await
    }

    /// False only when the user or policy has turned location access off
    pub async fn is_authorized_for_monitoring(&self) -> bool {
        !self.service.authorization_status().await.is_denied()
    }

    /// Last authorization state delivered to this monitor
    pub async fn authorization(&self) -> AuthorizationState {
        self.authorization.current().await
    }

    pub async fn monitored_regions(&self) -> Vec<MonitoredRegion> {
        self.service.monitored_regions().await
    }

    /// Rebuild or tear down the region set for a new authorization state.
    ///
    /// Returns whether monitoring is now enabled. Observers receive a
    /// `MonitoringChanged` event in every case, including a platform failure.
    pub async fn on_authorization_changed(&self, state: AuthorizationState) -> Result<bool> {
        self.authorization.record(state).await;

        let result = if state.allows_monitoring() {
            self.rebuild_regions().await.map(|_| true)
        } else {
            if state.is_denied() {
                let err = ProximityError::AuthorizationDenied(format!(
                    "location authorization is {}",
                    state
                ));
                ErrorContext::new()
                    .with_info(AuthorizationTracker::denial_message())
                    .log(&err, err.kind());
            }
            self.stop_all().await.map(|_| false)
        };

        let enabled = matches!(result, Ok(true));
        info!(%state, enabled, "Region monitoring updated");
        self.emit(&MonitorEvent::MonitoringChanged { enabled }).await;

        if let Err(ref e) = result {
            ErrorContext::new()
                .with_info(format!("authorization {}", state))
                .log(e, e.kind());
        }
        result
    }

    /// Resolve a platform region entry into a terminal identity.
    ///
    /// Non-beacon regions are ignored; beacon regions must carry major and minor.
    pub async fn on_region_enter(
        &self,
        region: &RegionDescriptor,
    ) -> Result<Option<BeaconIdentity>> {
        let Some(beacon) = self.resolve(region)? else {
            debug!(identifier = %region.identifier, "Ignoring non-beacon region entry");
            return Ok(None);
        };

        info!(beacon = %beacon, "Entered terminal region");
        self.emit(&MonitorEvent::RegionEntered(beacon)).await;
        Ok(Some(beacon))
    }

    pub async fn on_region_exit(
        &self,
        region: &RegionDescriptor,
    ) -> Result<Option<BeaconIdentity>> {
        let Some(beacon) = self.resolve(region)? else {
            debug!(identifier = %region.identifier, "Ignoring non-beacon region exit");
            return Ok(None);
        };

        info!(beacon = %beacon, "Exited terminal region");
        self.emit(&MonitorEvent::RegionExited(beacon)).await;
        Ok(Some(beacon))
    }

    fn resolve(&self, region: &RegionDescriptor) -> Result<Option<BeaconIdentity>> {
        Ok(region
            .beacon_numbers()?
            .map(|(major, minor)| self.beacons.identity_for(major, minor)))
    }

    /// Clears and re-registers every terminal. A failed registration leaves no
    /// region monitored.
    async fn rebuild_regions(&self) -> Result<()> {
        self.stop_all().await?;

        for beacon in self.beacons.terminals() {
            let registered = self
                .service
                .start_monitoring(MonitoredRegion::for_terminal(beacon))
                .await;
            if let Err(e) = registered {
                if let Err(cleanup) = self.stop_all().await {
                    warn!(error = %cleanup, "Could not clear partially registered regions");
                }
                return Err(e);
            }
        }

        debug!(
            first = self.beacons.minor_first,
            last = self.beacons.minor_last,
            "Registered terminal regions"
        );
        Ok(())
    }

    async fn stop_all(&self) -> Result<()> {
        for region in self.service.monitored_regions().await {
            self.service.stop_monitoring(&region.identifier).await?;
        }
        Ok(())
    }

    async fn emit(&self, event: &MonitorEvent) {
        let handlers = self.handlers.read().await.clone();
        for handler in handlers {
            handler(event);
        }
    }
}
