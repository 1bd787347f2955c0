//! Application-under-test lifecycle for runway
//!
//! Builds the application, starts it in the background and waits until it
//! answers HTTP requests.

pub mod lifecycle;
pub mod readiness;

pub use lifecycle::ServerLifecycle;
pub use readiness::{ReadinessProbe, DEFAULT_RETRY_INTERVAL};
