// Application lifecycle tracking
// The router only reaches the UI directly while the app is frontmost

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Application state for lifecycle management
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Application is in the foreground and active
    Foreground,
    /// Application is in the background
    Background,
}

/// Tracks whether the app is frontmost
pub struct LifecycleManager {
    app_state: Arc<RwLock<AppState>>,
    backgrounded_at: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl LifecycleManager {
    /// Beacon callbacks usually wake a suspended app, so tracking starts in the background
    pub fn new() -> Self {
        Self::starting_in(AppState::Background)
    }

    pub fn starting_in(state: AppState) -> Self {
        let backgrounded_at = match state {
            AppState::Background => Some(Utc::now()),
            AppState::Foreground => None,
        };
        Self {
            app_state: Arc::new(RwLock::new(state)),
            backgrounded_at: Arc::new(RwLock::new(backgrounded_at)),
        }
    }

    pub async fn get_state(&self) -> AppState {
        *self.app_state.read().await
    }

    pub async fn on_background(&self) {
        let mut state = self.app_state.write().await;
        if *state == AppState::Background {
            return;
        }
        info!("Application moving to background");
        *state = AppState::Background;
        *self.backgrounded_at.write().await = Some(Utc::now());
    }

    pub async fn on_foreground(&self) {
        let mut state = self.app_state.write().await;
        if *state == AppState::Foreground {
            return;
        }
        let since = self.backgrounded_at.write().await.take();
        info!(
            background_secs = since.map(|t| (Utc::now() - t).num_seconds()),
            "Application returning to foreground"
        );
        *state = AppState::Foreground;
    }

    pub async fn is_foreground(&self) -> bool {
        *self.app_state.read().await == AppState::Foreground
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new()
    }
}
