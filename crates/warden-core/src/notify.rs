//! Notification channel shared by the guard components.
//!
//! All user-visible failures in this subsystem flow through the single
//! [`NotificationSink`]; nothing else surfaces errors to the user.

use serde::{Deserialize, Serialize};

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Fire-and-forget sink for user-visible notices.
///
/// Implementations must not block; no return value is consumed and the
/// caller never retries a delivery.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}
