//! Session domain module.
//!
//! This module contains the session-related domain models, the collaborator
//! interfaces the orchestrator consumes, and the inactivity watchdog.
//!
//! # Module Structure
//!
//! - `model`: Core session domain models (`Session`, `Role`)
//! - `provider`: Collaborator traits (`AuthProvider`, `Navigator`)
//! - `watchdog`: Inactivity watchdog (`ActivityWatchdog`, `ActivitySignal`)

mod model;
mod provider;
mod watchdog;

// Re-export public API
pub use model::{Role, Session};
pub use provider::{AuthProvider, Navigator};
pub use watchdog::{ActivitySignal, ActivityWatchdog, ExpiryCallback};
