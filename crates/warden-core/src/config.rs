//! Guard configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_idle_timeout_secs() -> u64 {
    // 20 minutes
    20 * 60
}

fn default_privileged_role() -> String {
    "admin".to_string()
}

fn default_entry_point() -> String {
    "/login".to_string()
}

fn default_per_page() -> u32 {
    25
}

/// Configuration for the session and data-integrity guard.
///
/// All fields have defaults so a missing or partial configuration file
/// yields a working guard.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Idle threshold in seconds before the session is declared idle.
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,

    /// Role that passes gate checks when a region declares no required
    /// roles (deny-by-default posture).
    #[serde(default = "default_privileged_role")]
    pub privileged_role: String,

    /// Navigation target for the unauthenticated entry point.
    #[serde(default = "default_entry_point")]
    pub entry_point: String,

    /// Default page size for list views.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: default_idle_timeout_secs(),
            privileged_role: default_privileged_role(),
            entry_point: default_entry_point(),
            per_page: default_per_page(),
        }
    }
}

impl GuardConfig {
    /// Returns the idle threshold as a `Duration`.
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}
