// Handles the user's answer to a payment notification
// Drives the visual lifecycle of one notification:
// Pending -> InProgress -> Succeeded/Failed -> Dismissed

use backend::BackendClient;
use dashmap::DashMap;
use shared::{ErrorContext, NotificationConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{NotificationError, NotificationRecord, Result, ACTION_CANCEL, ACTION_INITIATE};

/// State of one notification interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Pending,
    InProgress,
    Succeeded,
    Failed { message: String },
    Dismissed,
}

impl InteractionState {
    pub fn can_transition_to(&self, next: &InteractionState) -> bool {
        matches!(
            (self, next),
            (InteractionState::Pending, InteractionState::InProgress)
                | (InteractionState::Pending, InteractionState::Dismissed)
                | (InteractionState::InProgress, InteractionState::Succeeded)
                | (InteractionState::InProgress, InteractionState::Failed { .. })
                | (InteractionState::Succeeded, InteractionState::Dismissed)
                | (InteractionState::Failed { .. }, InteractionState::Dismissed)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InteractionState::Dismissed)
    }
}

/// Artwork shown next to the notification text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceImage {
    Initiate,
    Progress,
    Error,
    Done,
}

impl SurfaceImage {
    pub fn asset_name(&self) -> &'static str {
        match self {
            SurfaceImage::Initiate => "notification_initiate",
            SurfaceImage::Progress => "notification_progress",
            SurfaceImage::Error => "notification_error",
            SurfaceImage::Done => "notification_done",
        }
    }
}

/// What the notification surface should display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub title: String,
    pub message: String,
    pub image: SurfaceImage,
}

impl NotificationView {
    fn for_state(state: &InteractionState, record: &NotificationRecord) -> Option<Self> {
        let view = match state {
            InteractionState::Pending => NotificationView {
                title: record.title.clone(),
                message: record.body.clone(),
                image: SurfaceImage::Initiate,
            },
            InteractionState::InProgress => NotificationView {
                title: "Action in progress".to_string(),
                message: "Please wait...".to_string(),
                image: SurfaceImage::Progress,
            },
            InteractionState::Succeeded => NotificationView {
                title: "Action succeeded".to_string(),
                message: "SUCCESS".to_string(),
                image: SurfaceImage::Done,
            },
            InteractionState::Failed { message } => NotificationView {
                title: "Action failed".to_string(),
                message: message.clone(),
                image: SurfaceImage::Error,
            },
            InteractionState::Dismissed => return None,
        };
        Some(view)
    }
}

/// Update posted to the UI context. The host drains these on its main thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceUpdate {
    Render {
        notification_id: Uuid,
        state: InteractionState,
        view: NotificationView,
    },
    /// The host should signal dismissal to the platform
    Dismiss { notification_id: Uuid },
}

/// Which notification button the user tapped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseAction {
    Accept,
    Cancel,
    Other(String),
}

impl ResponseAction {
    pub fn from_identifier(identifier: &str) -> Self {
        match identifier {
            ACTION_INITIATE => ResponseAction::Accept,
            ACTION_CANCEL => ResponseAction::Cancel,
            other => ResponseAction::Other(other.to_string()),
        }
    }
}

/// Response callback payload from the platform
#[derive(Debug, Clone)]
pub struct NotificationResponse {
    pub action_identifier: String,
    pub notification: NotificationRecord,
}

/// What the host should tell the platform once `respond` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOption {
    Dismiss,
    DoNotDismiss,
}

pub struct ActionResponder {
    backend: Arc<dyn BackendClient>,
    ui: mpsc::UnboundedSender<SurfaceUpdate>,
    dismiss_delay: Duration,
    interactions: DashMap<Uuid, InteractionState>,
}

impl ActionResponder {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        ui: mpsc::UnboundedSender<SurfaceUpdate>,
        config: &NotificationConfig,
    ) -> Self {
        Self {
            backend,
            ui,
            dismiss_delay: config.dismiss_delay(),
            interactions: DashMap::new(),
        }
    }

    /// Create a responder together with the receiving end of its UI channel
    pub fn with_channel(
        backend: Arc<dyn BackendClient>,
        config: &NotificationConfig,
    ) -> (Self, mpsc::UnboundedReceiver<SurfaceUpdate>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(backend, tx, config), rx)
    }

    /// Current state of an interaction. `None` before it is presented or answered,
    /// and again once the host has forgotten it.
    pub fn state_of(&self, notification_id: &Uuid) -> Option<InteractionState> {
        self.interactions.get(notification_id).map(|s| s.value().clone())
    }

    /// Show a delivered notification in its initial look
    pub fn present(&self, notification: &NotificationRecord) {
        let state = self
            .interactions
            .entry(notification.id)
            .or_insert(InteractionState::Pending)
            .value()
            .clone();
        if state.is_terminal() {
            debug!(notification_id = %notification.id, "Not presenting dismissed notification");
            return;
        }
        debug!(notification_id = %notification.id, "Presenting notification");
        self.render(notification, InteractionState::Pending);
    }

    /// Drop all state for a notification the platform no longer shows.
    ///
    /// Dismissed interactions are kept until this is called so late responses
    /// cannot restart them.
    pub fn forget(&self, notification_id: &Uuid) {
        if let Some((_, state)) = self.interactions.remove(notification_id) {
            debug!(%notification_id, state = ?state, "Forgot notification interaction");
        }
    }

    /// Number of interactions still tracked
    pub fn tracked(&self) -> usize {
        self.interactions.len()
    }

    /// Handle the user's tap on one of the notification's actions.
    ///
    /// For "accept" this resolves only after the dismissal delay has elapsed.
    pub async fn respond(&self, response: NotificationResponse) -> ResponseOption {
        let record = &response.notification;

        if self.state_of(&record.id).is_some_and(|state| state.is_terminal()) {
            debug!(notification_id = %record.id, "Response for dismissed notification");
            return ResponseOption::Dismiss;
        }

        match ResponseAction::from_identifier(&response.action_identifier) {
            ResponseAction::Cancel => {
                info!(notification_id = %record.id, "Payment cancelled by user");
                match self.transition(record.id, InteractionState::Dismissed) {
                    Ok(()) => {
                        self.dismiss(record.id);
                        ResponseOption::Dismiss
                    }
                    Err(e) => {
                        warn!(notification_id = %record.id, error = %e, "Ignoring cancel");
                        ResponseOption::DoNotDismiss
                    }
                }
            }
            ResponseAction::Accept => self.accept(record).await,
            ResponseAction::Other(identifier) => {
                debug!(
                    notification_id = %record.id,
                    identifier = %identifier,
                    "Unhandled notification action"
                );
                ResponseOption::DoNotDismiss
            }
        }
    }

    async fn accept(&self, record: &NotificationRecord) -> ResponseOption {
        if let Err(e) = self.transition(record.id, InteractionState::InProgress) {
            warn!(notification_id = %record.id, error = %e, "Ignoring repeated accept");
            return ResponseOption::DoNotDismiss;
        }
        self.render(record, InteractionState::InProgress);

        let outcome = match self.perform(record).await {
            Ok(()) => InteractionState::Succeeded,
            Err(err) => {
                let mut context = ErrorContext::new().with_notification_id(record.id);
                if let Ok(metadata) = record.decode_metadata() {
                    context = context
                        .with_beacon(metadata.beacon)
                        .with_action_id(metadata.action_id);
                }
                context.log(&err, err.kind());
                InteractionState::Failed {
                    message: err.user_message(),
                }
            }
        };

        if let Err(e) = self.transition(record.id, outcome.clone()) {
            warn!(notification_id = %record.id, error = %e, "Interaction changed while in flight");
        }
        self.render(record, outcome);

        tokio::time::sleep(self.dismiss_delay).await;

        if let Err(e) = self.transition(record.id, InteractionState::Dismissed) {
            warn!(notification_id = %record.id, error = %e, "Dismissing out of order");
        }
        self.dismiss(record.id);
        ResponseOption::Dismiss
    }

    async fn perform(&self, record: &NotificationRecord) -> Result<()> {
        let metadata = record.decode_metadata()?;
        self.backend.perform_action(&metadata.action_id).await?;
        info!(notification_id = %record.id, action_id = %metadata.action_id, "Action succeeded");
        Ok(())
    }

    /// Move one interaction forward. An unknown notification counts as Pending.
    fn transition(&self, notification_id: Uuid, next: InteractionState) -> Result<()> {
        let mut entry = self
            .interactions
            .entry(notification_id)
            .or_insert(InteractionState::Pending);

        if entry.is_terminal() || !entry.can_transition_to(&next) {
            return Err(NotificationError::InvalidTransition {
                from: entry.value().clone(),
                to: next,
            });
        }

        debug!(%notification_id, from = ?*entry, to = ?next, "Interaction transition");
        *entry = next;
        Ok(())
    }

    fn render(&self, record: &NotificationRecord, state: InteractionState) {
        if let Some(view) = NotificationView::for_state(&state, record) {
            self.post(SurfaceUpdate::Render {
                notification_id: record.id,
                state,
                view,
            });
        }
    }

    fn dismiss(&self, notification_id: Uuid) {
        self.interactions.insert(notification_id, InteractionState::Dismissed);
        self.post(SurfaceUpdate::Dismiss { notification_id });
    }

    fn post(&self, update: SurfaceUpdate) {
        if self.ui.send(update).is_err() {
            debug!("UI context gone, dropping surface update");
        }
    }
}
