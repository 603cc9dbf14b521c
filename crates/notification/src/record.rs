use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shared::{amount_for, BeaconIdentity, PendingAction};
use uuid::Uuid;

use crate::{NotificationError, Result};

/// Category of every payment notification
pub const CATEGORY_INITIATE: &str = "initiate";

/// Action identifier for "Pay"
pub const ACTION_INITIATE: &str = "initiate";

pub const ACTION_CANCEL: &str = "cancel";

/// A button offered on an actionable notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub identifier: String,
    pub title: String,
    pub destructive: bool,
}

/// Set of actions the platform shows for notifications of one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCategory {
    pub identifier: String,
    pub actions: Vec<NotificationAction>,
}

impl NotificationCategory {
    /// The "Pay" / "Cancel" category used for payment prompts
    pub fn payment() -> Self {
        Self {
            identifier: CATEGORY_INITIATE.to_string(),
            actions: vec![
                NotificationAction {
                    identifier: ACTION_INITIATE.to_string(),
                    title: "Pay".to_string(),
                    destructive: false,
                },
                NotificationAction {
                    identifier: ACTION_CANCEL.to_string(),
                    title: "Cancel".to_string(),
                    destructive: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationSound {
    Default,
    Silent,
}

/// Identifying payload carried inside a notification, so the responder can act
/// on it without another lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    pub action_id: String,
    #[serde(flatten)]
    pub beacon: BeaconIdentity,
}

impl NotificationMetadata {
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(NotificationError::SerializationError(format!(
                "metadata serialized to non-object: {}",
                other
            ))),
        }
    }

    pub fn from_map(map: &Map<String, Value>) -> Result<Self> {
        let metadata: NotificationMetadata = serde_json::from_value(Value::Object(map.clone()))
            .map_err(|e| NotificationError::MissingMetadata(e.to_string()))?;
        if metadata.action_id.is_empty() {
            return Err(NotificationError::MissingMetadata(
                "empty action id".to_string(),
            ));
        }
        Ok(metadata)
    }
}

/// Platform-visible projection of a pending action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub sound: NotificationSound,
    pub category_id: String,
    pub metadata: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Build the payment prompt for `action` under a fresh identifier
    pub fn for_action(action: &PendingAction, currency: &str) -> Result<Self> {
        let metadata = NotificationMetadata {
            action_id: action.action_id.clone(),
            beacon: action.beacon,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            title: format!("Payment requested at Terminal {}", action.beacon.minor),
            body: format!("Pay {} {}?", amount_for(&action.beacon), currency),
            sound: NotificationSound::Default,
            category_id: CATEGORY_INITIATE.to_string(),
            metadata: metadata.to_map()?,
            created_at: action.created_at,
        })
    }

    pub fn decode_metadata(&self) -> Result<NotificationMetadata> {
        NotificationMetadata::from_map(&self.metadata)
    }
}
