use async_trait::async_trait;
use shared::BeaconIdentity;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::{BackendClient, BackendError, Result};

/// Scripted backend for tests and offline runs.
///
/// Records every call so callers can assert on how often the backend was hit.
pub struct MockBackendClient {
    lookup_response: std::result::Result<Option<String>, String>,
    perform_response: std::result::Result<(), String>,
    perform_delay: Option<Duration>,
    lookup_calls: RwLock<Vec<BeaconIdentity>>,
    perform_calls: RwLock<Vec<String>>,
}

impl MockBackendClient {
    /// Backend that has no pending action and accepts every perform call
    pub fn new() -> Self {
        Self {
            lookup_response: Ok(None),
            perform_response: Ok(()),
            perform_delay: None,
            lookup_calls: RwLock::new(Vec::new()),
            perform_calls: RwLock::new(Vec::new()),
        }
    }

    pub fn with_action(mut self, action_id: impl Into<String>) -> Self {
        self.lookup_response = Ok(Some(action_id.into()));
        self
    }

    pub fn with_failing_lookup(mut self, reason: impl Into<String>) -> Self {
        self.lookup_response = Err(reason.into());
        self
    }

    pub fn with_failing_perform(mut self, reason: impl Into<String>) -> Self {
        self.perform_response = Err(reason.into());
        self
    }

    pub fn with_perform_delay(mut self, delay: Duration) -> Self {
        self.perform_delay = Some(delay);
        self
    }

    pub async fn lookup_calls(&self) -> Vec<BeaconIdentity> {
        self.lookup_calls.read().await.clone()
    }

    pub async fn perform_calls(&self) -> Vec<String> {
        self.perform_calls.read().await.clone()
    }
}

impl Default for MockBackendClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BackendClient for MockBackendClient {
    async fn lookup_action(&self, beacon: &BeaconIdentity) -> Result<Option<String>> {
        self.lookup_calls.write().await.push(*beacon);
        self.lookup_response
            .clone()
            .map_err(BackendError::LookupFailed)
    }

    async fn perform_action(&self, action_id: &str) -> Result<()> {
        self.perform_calls.write().await.push(action_id.to_string());
        if let Some(delay) = self.perform_delay {
            tokio::time::sleep(delay).await;
        }
        self.perform_response
            .clone()
            .map_err(BackendError::ActionFailed)
    }
}
