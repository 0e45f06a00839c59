//! Notification sink backed by tracing.

use warden_core::notify::{NotificationSink, Severity};

/// `NotificationSink` that forwards notices to the tracing subscriber.
///
/// Suitable as a default sink when no UI notification channel is wired
/// up yet.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!("[Notification] {}", message),
            Severity::Warning => tracing::warn!("[Notification] {}", message),
            Severity::Error => tracing::error!("[Notification] {}", message),
        }
    }
}
