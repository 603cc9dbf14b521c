pub mod types;
pub mod error;
pub mod platform;
pub mod permissions;
pub mod monitor;
pub mod router;
pub mod lifecycle;

pub use types::*;
pub use error::{ProximityError, Result};
pub use platform::{InMemoryRegionService, RegionMonitoringService};
pub use permissions::AuthorizationTracker;
pub use monitor::{EventHandler, ProximityMonitor};
pub use router::{ForegroundObserver, ProximityRouter};
pub use lifecycle::{AppState, LifecycleManager};
