pub mod logging;
pub mod trigger;

pub use logging::{init_logging, init_logging_pretty};
pub use trigger::{Collaborators, PaymentTrigger};
