// Composition root: wires monitor, router, scheduler and responder together
// and exposes the entry points the host platform calls into.

use backend::{BackendClient, HttpBackendClient};
use notification::{
    ActionResponder, NotificationCenter, NotificationRecord, NotificationResponse,
    NotificationScheduler, ResponseOption, SurfaceUpdate,
};
use proximity::{
    LifecycleManager, MonitorEvent, ProximityMonitor, ProximityRouter, RegionDescriptor,
    RegionMonitoringService, RouteOutcome,
};
use shared::{AuthorizationState, BeaconIdentity, Config, ErrorContext};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{info, warn};
use uuid::Uuid;

/// Platform services the host injects
pub struct Collaborators {
    pub backend: Arc<dyn BackendClient>,
    pub regions: Arc<dyn RegionMonitoringService>,
    pub notifications: Arc<dyn NotificationCenter>,
}

pub struct PaymentTrigger {
    monitor: ProximityMonitor,
    router: ProximityRouter,
    scheduler: Arc<NotificationScheduler>,
    responder: ActionResponder,
    lifecycle: LifecycleManager,
}

impl PaymentTrigger {
    /// Build every component from injected collaborators.
    ///
    /// The returned receiver carries notification surface updates; the host must
    /// drain it on its UI thread.
    pub fn new(
        config: &Config,
        collaborators: Collaborators,
    ) -> (Self, UnboundedReceiver<SurfaceUpdate>) {
        let Collaborators {
            backend,
            regions,
            notifications,
        } = collaborators;

        let scheduler = Arc::new(NotificationScheduler::new(
            notifications,
            &config.notification,
        ));
        let (responder, ui) = ActionResponder::with_channel(backend.clone(), &config.notification);

        let trigger = Self {
            monitor: ProximityMonitor::new(regions, config.beacon.clone()),
            router: ProximityRouter::new(backend, scheduler.clone()),
            scheduler,
            responder,
            lifecycle: LifecycleManager::new(),
        };
        (trigger, ui)
    }

    /// Same as [`PaymentTrigger::new`] with the HTTP backend from `config`
    pub fn with_http_backend(
        config: &Config,
        regions: Arc<dyn RegionMonitoringService>,
        notifications: Arc<dyn NotificationCenter>,
    ) -> anyhow::Result<(Self, UnboundedReceiver<SurfaceUpdate>)> {
        let backend = Arc::new(HttpBackendClient::new(&config.backend)?);
        Ok(Self::new(
            config,
            Collaborators {
                backend,
                regions,
                notifications,
            },
        ))
    }

    /// Register the payment category and ask for notification and location access
    pub async fn start(&self) -> anyhow::Result<()> {
        self.scheduler.register_categories().await?;

        if !self.scheduler.request_authorization().await? {
            warn!("Notifications declined; background payments will not be offered");
        }

        if self.monitor.is_authorized_for_monitoring().await {
            self.monitor.request_authorization().await?;
        } else {
            warn!("Location access denied; terminals will not be detected");
        }

        info!("Payment trigger started");
        Ok(())
    }

    pub async fn on_monitor_event<F>(&self, handler: F)
    where
        F: Fn(&MonitorEvent) + Send + Sync + 'static,
    {
        self.monitor.on_event(handler).await;
    }

    /// Receives terminals while the app is frontmost
    pub async fn set_foreground_observer<F>(&self, observer: F)
    where
        F: Fn(BeaconIdentity) + Send + Sync + 'static,
    {
        self.router.set_foreground_observer(observer).await;
    }

    pub async fn clear_foreground_observer(&self) {
        self.router.clear_foreground_observer().await;
    }

    /// Returns whether monitoring is now enabled
    pub async fn on_authorization_changed(&self, state: AuthorizationState) -> bool {
        // Failures are logged by the monitor
        self.monitor
            .on_authorization_changed(state)
            .await
            .unwrap_or(false)
    }

    /// Resolve a region entry and route the terminal.
    ///
    /// `None` when the region is not a terminal or could not be read.
    pub async fn on_region_enter(&self, region: &RegionDescriptor) -> Option<RouteOutcome> {
        let beacon = match self.monitor.on_region_enter(region).await {
            Ok(beacon) => beacon?,
            Err(e) => {
                ErrorContext::new()
                    .with_info(format!("region {}", region.identifier))
                    .log(&e, e.kind());
                return None;
            }
        };

        let foreground = self.lifecycle.is_foreground().await;
        Some(self.router.route(beacon, foreground).await)
    }

    pub async fn on_region_exit(&self, region: &RegionDescriptor) {
        if let Err(e) = self.monitor.on_region_exit(region).await {
            ErrorContext::new()
                .with_info(format!("region {}", region.identifier))
                .log(&e, e.kind());
        }
    }

    pub async fn enter_foreground(&self) {
        self.lifecycle.on_foreground().await;
    }

    pub async fn enter_background(&self) {
        self.lifecycle.on_background().await;
    }

    /// The notification content surface opened for `record`
    pub fn present_notification(&self, record: &NotificationRecord) {
        self.responder.present(record);
    }

    pub async fn respond(&self, response: NotificationResponse) -> ResponseOption {
        self.responder.respond(response).await
    }

    /// The OS removed the notification; its interaction state is released
    pub fn on_notification_removed(&self, notification_id: &Uuid) {
        self.responder.forget(notification_id);
    }

    pub fn responder(&self) -> &ActionResponder {
        &self.responder
    }
}
