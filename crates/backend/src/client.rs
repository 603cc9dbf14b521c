use async_trait::async_trait;
use shared::BeaconIdentity;

use crate::Result;

/// Remote service that owns pending payment actions
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Resolve a beacon sighting to a pending action id.
    ///
    /// `Ok(None)` means the terminal has nothing waiting for this device.
    async fn lookup_action(&self, beacon: &BeaconIdentity) -> Result<Option<String>>;

    /// Execute the action. Resolves once the backend has accepted or rejected it.
    async fn perform_action(&self, action_id: &str) -> Result<()>;
}
