//! Infrastructure adapters for the Warden guard.
//!
//! Configuration loading plus reference implementations of the
//! collaborator traits from `warden-core`, suitable for embedding and
//! for tests.

pub mod config_service;
pub mod memory_data;
pub mod nav_recording;
pub mod notify_tracing;
pub mod paths;
pub mod static_auth;

pub use config_service::ConfigService;
pub use memory_data::InMemoryDataProvider;
pub use nav_recording::RecordingNavigator;
pub use notify_tracing::TracingNotificationSink;
pub use static_auth::StaticAuthProvider;
