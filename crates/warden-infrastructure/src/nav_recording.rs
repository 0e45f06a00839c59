//! Recording navigator.

use std::sync::RwLock;
use warden_core::session::Navigator;

/// `Navigator` that records redirect targets instead of navigating.
///
/// Embedders poll [`RecordingNavigator::last_target`] to drive their own
/// routing; tests assert on it directly.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    targets: RwLock<Vec<String>>,
}

impl RecordingNavigator {
    /// Creates a navigator with no recorded redirects.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent redirect target, if any.
    pub fn last_target(&self) -> Option<String> {
        self.targets.read().unwrap().last().cloned()
    }

    /// Number of redirects observed.
    pub fn redirect_count(&self) -> usize {
        self.targets.read().unwrap().len()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, target: &str) {
        tracing::debug!("[RecordingNavigator] redirect to {}", target);
        self.targets.write().unwrap().push(target.to_string());
    }
}
