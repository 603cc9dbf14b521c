pub mod error;
pub mod record;
pub mod center;
pub mod scheduler;
pub mod responder;

pub use error::{NotificationError, Result};
pub use record::{
    NotificationAction, NotificationCategory, NotificationMetadata, NotificationRecord,
    NotificationSound, ACTION_CANCEL, ACTION_INITIATE, CATEGORY_INITIATE,
};
pub use center::{
    AuthorizationOptions, InMemoryNotificationCenter, NotificationAuthorization,
    NotificationCenter,
};
pub use scheduler::NotificationScheduler;
pub use responder::{
    ActionResponder, InteractionState, NotificationResponse, NotificationView, ResponseAction,
    ResponseOption, SurfaceImage, SurfaceUpdate,
};
