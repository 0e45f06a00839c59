//! Inactivity watchdog.
//!
//! Maintains exactly one pending idle deadline per armed session. Any
//! qualifying activity signal pushes the deadline to now + T; if the
//! deadline is reached uncancelled, the termination callback is invoked
//! exactly once and the watchdog goes dormant until re-armed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

/// A qualifying user-activity signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivitySignal {
    PointerMove,
    KeyPress,
    Scroll,
    Tap,
    Click,
}

/// Callback invoked exactly once when the idle deadline expires.
///
/// The watchdog only invokes the callback; retry/backoff on a failing
/// logout belongs to the logout collaborator.
pub type ExpiryCallback = Arc<dyn Fn() + Send + Sync>;

/// Inactivity watchdog for one armed session.
///
/// Internally a single tokio task holds the pending deadline and listens
/// for activity signals. Disarming (or dropping the handle) cancels the
/// task, so the deadline can never fire after its owner is gone.
///
/// Must be armed from within a tokio runtime.
pub struct ActivityWatchdog {
    activity_tx: mpsc::UnboundedSender<ActivitySignal>,
    cancel: CancellationToken,
    armed: Arc<AtomicBool>,
}

impl ActivityWatchdog {
    /// Arms the watchdog with the given idle threshold.
    ///
    /// # Arguments
    ///
    /// * `idle_timeout` - Duration of inactivity after which the session
    ///   is declared idle
    /// * `on_expiry` - Callback invoked exactly once on expiry
    pub fn arm(idle_timeout: Duration, on_expiry: ExpiryCallback) -> Self {
        let (activity_tx, mut activity_rx) = mpsc::unbounded_channel::<ActivitySignal>();
        let cancel = CancellationToken::new();
        let armed = Arc::new(AtomicBool::new(true));

        let task_cancel = cancel.clone();
        let task_armed = armed.clone();
        tokio::spawn(async move {
            let mut deadline = Instant::now() + idle_timeout;
            loop {
                tokio::select! {
                    biased;
                    _ = task_cancel.cancelled() => {
                        tracing::debug!("[ActivityWatchdog] disarmed before expiry");
                        break;
                    }
                    signal = activity_rx.recv() => match signal {
                        Some(signal) => {
                            tracing::debug!("[ActivityWatchdog] activity: {:?}", signal);
                            deadline = Instant::now() + idle_timeout;
                        }
                        // All senders dropped; nothing can reset the
                        // deadline anymore, treat as teardown.
                        None => break,
                    },
                    _ = time::sleep_until(deadline) => {
                        task_armed.store(false, Ordering::SeqCst);
                        tracing::info!(
                            "[ActivityWatchdog] idle deadline reached after {:?}",
                            idle_timeout
                        );
                        on_expiry();
                        break;
                    }
                }
            }
            task_armed.store(false, Ordering::SeqCst);
        });

        Self {
            activity_tx,
            cancel,
            armed,
        }
    }

    /// Records a qualifying activity signal, resetting the idle deadline.
    ///
    /// A no-op once the watchdog has expired or been disarmed.
    pub fn record_activity(&self, signal: ActivitySignal) {
        if !self.is_armed() {
            return;
        }
        // Send can only fail when the task already exited; that is the
        // dormant state, so the signal is dropped on purpose.
        let _ = self.activity_tx.send(signal);
    }

    /// Returns whether the deadline is still pending.
    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst) && !self.cancel.is_cancelled()
    }

    /// Cancels the pending deadline and puts the watchdog to rest.
    ///
    /// Idempotent; safe to call after expiry.
    pub fn disarm(&self) {
        self.cancel.cancel();
        self.armed.store(false, Ordering::SeqCst);
    }
}

impl Drop for ActivityWatchdog {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counting_callback() -> (ExpiryCallback, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = fired.clone();
        let callback: ExpiryCallback = Arc::new(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });
        (callback, fired)
    }

    async fn run_tasks() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_exactly_once_after_timeout() {
        let (callback, fired) = counting_callback();
        let watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);

        time::advance(Duration::from_secs(61)).await;
        run_tasks().await;

        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(!watchdog.is_armed());

        // Stays dormant: more time passing never re-fires.
        time::advance(Duration::from_secs(120)).await;
        run_tasks().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_resets_deadline() {
        let (callback, fired) = counting_callback();
        let watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);

        // A signal just before the deadline pushes it out.
        time::advance(Duration::from_secs(59)).await;
        watchdog.record_activity(ActivitySignal::Click);
        run_tasks().await;

        time::advance(Duration::from_secs(59)).await;
        run_tasks().await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(watchdog.is_armed());

        // No further activity: now it fires.
        time::advance(Duration::from_secs(2)).await;
        run_tasks().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_activity_never_fires() {
        let (callback, fired) = counting_callback();
        let watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);

        for signal in [
            ActivitySignal::PointerMove,
            ActivitySignal::KeyPress,
            ActivitySignal::Scroll,
            ActivitySignal::Tap,
        ] {
            time::advance(Duration::from_secs(45)).await;
            watchdog.record_activity(signal);
            run_tasks().await;
        }

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(watchdog.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_cancels_pending_deadline() {
        let (callback, fired) = counting_callback();
        let watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);

        watchdog.disarm();
        run_tasks().await;

        time::advance(Duration::from_secs(120)).await;
        run_tasks().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert!(!watchdog.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_deadline() {
        let (callback, fired) = counting_callback();
        {
            let _watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);
        }
        run_tasks().await;

        time::advance(Duration::from_secs(120)).await;
        run_tasks().await;

        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_record_activity_after_expiry_is_noop() {
        let (callback, fired) = counting_callback();
        let watchdog = ActivityWatchdog::arm(Duration::from_secs(60), callback);

        time::advance(Duration::from_secs(61)).await;
        run_tasks().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Dormant: signals are dropped without effect.
        watchdog.record_activity(ActivitySignal::Click);
        run_tasks().await;
        assert!(!watchdog.is_armed());
    }
}
