pub mod client;
pub mod error;
pub mod http;
pub mod mock;

pub use client::BackendClient;
pub use error::{BackendError, Result};
pub use http::HttpBackendClient;
pub use mock::MockBackendClient;
