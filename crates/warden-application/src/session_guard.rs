//! Session guard orchestration.
//!
//! This module provides the `SessionGuard` which composes the inactivity
//! watchdog, the capability gate, the query cache registry and the list
//! controllers around one authenticated session, and performs the ordered
//! termination sequence they all depend on.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use warden_core::cache::{QueryCache, QueryCacheRegistry};
use warden_core::capability::{CapabilityGate, Visibility};
use warden_core::config::GuardConfig;
use warden_core::error::Result;
use warden_core::list::DataProvider;
use warden_core::notify::NotificationSink;
use warden_core::session::{
    ActivitySignal, ActivityWatchdog, AuthProvider, ExpiryCallback, Navigator, Role, Session,
};

use crate::capability::CapabilityResolver;
use crate::list_view::ListViewController;

/// Why a session was terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// The inactivity watchdog expired.
    IdleTimeout,
    /// The user logged out explicitly.
    Logout,
    /// A collaborator rejected the session token.
    AuthRejected,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::IdleTimeout => "idle timeout",
            Self::Logout => "logout",
            Self::AuthRejected => "auth rejected",
        };
        f.write_str(reason)
    }
}

/// Callback invoked after the termination sequence has run.
pub type TerminationCallback = Arc<dyn Fn(TerminationReason) + Send + Sync>;

struct GuardInner {
    config: GuardConfig,
    auth: Arc<dyn AuthProvider>,
    data: Arc<dyn DataProvider>,
    notifier: Arc<dyn NotificationSink>,
    navigator: Arc<dyn Navigator>,
    gate: CapabilityGate,
    resolver: CapabilityResolver,
    cache: QueryCacheRegistry,
    /// The authenticated session. Owned exclusively here; every other
    /// component only reads it.
    session: RwLock<Option<Session>>,
    watchdog: Mutex<Option<ActivityWatchdog>>,
    observers: RwLock<Vec<TerminationCallback>>,
    terminating: AtomicBool,
}

/// Orchestrator for one browsing context's session.
///
/// `SessionGuard` is responsible for:
/// - Logging in and arming the inactivity watchdog
/// - Forwarding activity signals to the watchdog
/// - Deciding region visibility through the capability gate
/// - Wiring list controllers to the shared data provider
/// - Running the ordered termination sequence: cancel the pending idle
///   deadline, revoke the resolved role set, clear the query cache,
///   best-effort logout, then redirect to the unauthenticated entry
///   point. Cache clearance always happens before navigation so a
///   re-rendered frame can never read stale authorized data.
///
/// Cloning is cheap and shares the same guarded state.
#[derive(Clone)]
pub struct SessionGuard {
    inner: Arc<GuardInner>,
}

impl SessionGuard {
    /// Creates a guard around the given collaborators.
    pub fn new(
        config: GuardConfig,
        auth: Arc<dyn AuthProvider>,
        data: Arc<dyn DataProvider>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        let gate = CapabilityGate::new(Role::new(config.privileged_role.as_str()));
        let resolver = CapabilityResolver::new(auth.clone(), notifier.clone());
        Self {
            inner: Arc::new(GuardInner {
                config,
                auth,
                data,
                notifier,
                navigator,
                gate,
                resolver,
                cache: QueryCacheRegistry::new(),
                session: RwLock::new(None),
                watchdog: Mutex::new(None),
                observers: RwLock::new(Vec::new()),
                terminating: AtomicBool::new(false),
            }),
        }
    }

    /// Logs in, arms the watchdog and kicks off role resolution.
    ///
    /// Idempotent: if a session is already armed, it is returned as is.
    ///
    /// # Errors
    ///
    /// Returns an error if the login call fails; nothing is armed in
    /// that case.
    pub async fn arm_session(&self) -> Result<Session> {
        if let Some(existing) = self.session() {
            let armed = self
                .inner
                .watchdog
                .lock()
                .unwrap()
                .as_ref()
                .is_some_and(ActivityWatchdog::is_armed);
            if armed {
                tracing::debug!("[SessionGuard] session already armed, reusing");
                return Ok(existing);
            }
        }

        let session = self.inner.auth.login().await?;
        *self.inner.session.write().unwrap() = Some(session.clone());
        self.inner.terminating.store(false, Ordering::SeqCst);

        self.inner.resolver.resolve(&session.token);

        let weak = Arc::downgrade(&self.inner);
        let on_expiry: ExpiryCallback = Arc::new(move || {
            if let Some(inner) = weak.upgrade() {
                tokio::spawn(async move {
                    let guard = SessionGuard { inner };
                    guard.terminate(TerminationReason::IdleTimeout).await;
                });
            }
        });
        let watchdog = ActivityWatchdog::arm(self.inner.config.idle_timeout(), on_expiry);
        // Replacing the slot drops (and thereby cancels) any previous
        // watchdog left over from an expired session.
        *self.inner.watchdog.lock().unwrap() = Some(watchdog);

        tracing::info!("[SessionGuard] session armed");
        Ok(session)
    }

    /// Forwards a qualifying activity signal to the watchdog.
    ///
    /// A no-op when no session is armed.
    pub fn record_activity(&self, signal: ActivitySignal) {
        let watchdog = self.inner.watchdog.lock().unwrap();
        match watchdog.as_ref() {
            Some(watchdog) => watchdog.record_activity(signal),
            None => tracing::debug!("[SessionGuard] activity with no armed session, ignoring"),
        }
    }

    /// Terminates the session and runs the full cleanup sequence.
    ///
    /// Runs at most once per armed session; concurrent calls (e.g. an
    /// explicit logout racing the watchdog) collapse into one sequence.
    pub async fn terminate(&self, reason: TerminationReason) {
        if self.inner.terminating.swap(true, Ordering::SeqCst) {
            tracing::debug!("[SessionGuard] termination already in progress, skipping");
            return;
        }
        if self.session().is_none() {
            tracing::debug!("[SessionGuard] terminate with no session, nothing to do");
            return;
        }
        tracing::info!("[SessionGuard] terminating session ({})", reason);

        // 1. Cancel the pending idle deadline.
        if let Some(watchdog) = self.inner.watchdog.lock().unwrap().take() {
            watchdog.disarm();
        }

        // 2. Revoke the resolved role set; gate checks suppress until the
        //    next login resolves roles again.
        self.inner.resolver.revoke();

        // 3. Clear the shared query cache. Must precede the redirect so a
        //    re-rendered frame cannot read stale authorized data.
        self.inner.cache.clear();
        *self.inner.session.write().unwrap() = None;

        // 4. Best-effort server-side logout; never retried.
        if let Err(err) = self.inner.auth.logout().await {
            tracing::warn!("[SessionGuard] logout request failed: {}", err);
        }

        let observers = self.inner.observers.read().unwrap().clone();
        for observer in &observers {
            observer(reason);
        }

        // 5. Navigate to the unauthenticated entry point.
        self.inner.navigator.redirect(&self.inner.config.entry_point);
    }

    /// Explicit user logout.
    pub async fn log_out(&self) {
        self.terminate(TerminationReason::Logout).await;
    }

    /// Decides visibility of a region requiring any of `required`.
    ///
    /// Before any session exists the capability set is unresolved, so
    /// the region suppresses rather than flashing denied content.
    pub fn is_region_visible(&self, required: &[Role]) -> Visibility {
        let caps = self.inner.resolver.current();
        self.inner.gate.visibility(required, &caps)
    }

    /// Registers the process-wide query cache with the guard.
    pub fn register_cache(&self, cache: Arc<dyn QueryCache>) {
        self.inner.cache.register(cache);
    }

    /// The query cache registry handle.
    pub fn cache_registry(&self) -> &QueryCacheRegistry {
        &self.inner.cache
    }

    /// Registers a callback invoked after every termination sequence.
    pub fn on_session_terminated(&self, callback: TerminationCallback) {
        self.inner.observers.write().unwrap().push(callback);
    }

    /// Returns the current session, if armed.
    pub fn session(&self) -> Option<Session> {
        self.inner.session.read().unwrap().clone()
    }

    /// Returns whether a session is armed with a pending idle deadline.
    pub fn is_armed(&self) -> bool {
        self.inner
            .watchdog
            .lock()
            .unwrap()
            .as_ref()
            .is_some_and(ActivityWatchdog::is_armed)
    }

    /// Creates a list controller for a resource, wired to the shared
    /// data provider and notification sink.
    ///
    /// The controller reverts to its neutral state when the session
    /// terminates, superseding any in-flight fetch.
    pub fn list_view(&self, resource: impl Into<String>) -> ListViewController {
        let per_page = self.inner.config.per_page;
        let controller = ListViewController::new(
            resource.into(),
            self.inner.data.clone(),
            self.inner.notifier.clone(),
            self.clone(),
            per_page,
        );

        let shared = Arc::downgrade(controller.shared());
        self.on_session_terminated(Arc::new(move |_reason| {
            if let Some(shared) = shared.upgrade() {
                shared.detach(per_page);
            }
        }));

        controller
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use warden_core::error::WardenError;
    use warden_core::list::{FilterCriteria, ListPage, Pagination, SortSpec};
    use warden_core::notify::Severity;

    /// Records the order of externally visible termination effects.
    #[derive(Default)]
    struct EffectLog {
        effects: Mutex<Vec<String>>,
    }

    impl EffectLog {
        fn push(&self, effect: impl Into<String>) {
            self.effects.lock().unwrap().push(effect.into());
        }

        fn effects(&self) -> Vec<String> {
            self.effects.lock().unwrap().clone()
        }
    }

    struct MockAuth {
        log: Arc<EffectLog>,
        logins: AtomicUsize,
        fail_logout: bool,
    }

    impl MockAuth {
        fn new(log: Arc<EffectLog>) -> Arc<Self> {
            Arc::new(Self {
                log,
                logins: AtomicUsize::new(0),
                fail_logout: false,
            })
        }
    }

    #[async_trait]
    impl AuthProvider for MockAuth {
        async fn login(&self) -> warden_core::error::Result<Session> {
            self.logins.fetch_add(1, Ordering::SeqCst);
            Ok(Session::new("token-1", HashSet::from([Role::admin()])))
        }

        async fn logout(&self) -> warden_core::error::Result<()> {
            self.log.push("logout");
            if self.fail_logout {
                Err(WardenError::transport("logout failed"))
            } else {
                Ok(())
            }
        }

        async fn fetch_roles(&self, _token: &str) -> warden_core::error::Result<HashSet<Role>> {
            Ok(HashSet::from([Role::admin(), Role::new("viewer")]))
        }
    }

    struct MockData {
        auth_rejected: AtomicBool,
    }

    impl MockData {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                auth_rejected: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl DataProvider for MockData {
        async fn fetch_list(
            &self,
            _resource: &str,
            _filter: &FilterCriteria,
            _pagination: &Pagination,
            _sort: Option<&SortSpec>,
        ) -> warden_core::error::Result<ListPage> {
            if self.auth_rejected.load(Ordering::SeqCst) {
                return Err(WardenError::auth("token expired"));
            }
            Ok(ListPage {
                records: vec![serde_json::json!({ "id": 1 })],
                total: 1,
            })
        }
    }

    struct MockSink;

    impl NotificationSink for MockSink {
        fn notify(&self, _message: &str, _severity: Severity) {}
    }

    struct MockNavigator {
        log: Arc<EffectLog>,
    }

    impl Navigator for MockNavigator {
        fn redirect(&self, target: &str) {
            self.log.push(format!("redirect:{}", target));
        }
    }

    struct LoggingCache {
        log: Arc<EffectLog>,
    }

    impl QueryCache for LoggingCache {
        fn clear(&self) {
            self.log.push("cache_cleared");
        }
    }

    fn guard_with_log() -> (SessionGuard, Arc<EffectLog>, Arc<MockAuth>) {
        let log = Arc::new(EffectLog::default());
        let auth = MockAuth::new(log.clone());
        let guard = SessionGuard::new(
            GuardConfig::default(),
            auth.clone(),
            MockData::new(),
            Arc::new(MockSink),
            Arc::new(MockNavigator { log: log.clone() }),
        );
        (guard, log, auth)
    }

    async fn run_tasks() {
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_session_resolves_visibility() {
        let (guard, _log, _auth) = guard_with_log();

        // Before any session exists, gate checks suppress.
        assert_eq!(
            guard.is_region_visible(&[Role::new("viewer")]),
            Visibility::Suppress
        );

        guard.arm_session().await.unwrap();
        run_tasks().await;

        assert_eq!(
            guard.is_region_visible(&[Role::new("viewer")]),
            Visibility::Visible
        );
        assert_eq!(
            guard.is_region_visible(&[Role::new("auditor")]),
            Visibility::Hidden
        );
        assert!(guard.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_session_is_idempotent() {
        let (guard, _log, auth) = guard_with_log();

        let first = guard.arm_session().await.unwrap();
        let second = guard.arm_session().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(auth.logins.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_termination_effects_run_in_order() {
        let (guard, log, _auth) = guard_with_log();
        guard.arm_session().await.unwrap();
        run_tasks().await;

        let cache = Arc::new(LoggingCache { log: log.clone() });
        guard.register_cache(cache.clone());

        let observer_log = log.clone();
        guard.on_session_terminated(Arc::new(move |reason| {
            observer_log.push(format!("observer:{}", reason));
        }));

        guard.log_out().await;

        assert_eq!(
            log.effects(),
            vec![
                "cache_cleared",
                "logout",
                "observer:logout",
                "redirect:/login"
            ]
        );
        assert!(guard.session().is_none());
        assert_eq!(
            guard.is_region_visible(&[Role::admin()]),
            Visibility::Suppress
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_expiry_terminates_session() {
        let (guard, log, _auth) = guard_with_log();
        guard.arm_session().await.unwrap();
        run_tasks().await;

        tokio::time::advance(Duration::from_secs(20 * 60 + 1)).await;
        run_tasks().await;

        assert!(guard.session().is_none());
        assert!(log.effects().contains(&"redirect:/login".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_defers_expiry() {
        let (guard, _log, _auth) = guard_with_log();
        guard.arm_session().await.unwrap();
        run_tasks().await;

        tokio::time::advance(Duration::from_secs(19 * 60)).await;
        guard.record_activity(ActivitySignal::Click);
        run_tasks().await;

        tokio::time::advance(Duration::from_secs(19 * 60)).await;
        run_tasks().await;
        assert!(guard.session().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_runs_once() {
        let (guard, log, _auth) = guard_with_log();
        guard.arm_session().await.unwrap();
        run_tasks().await;

        guard.log_out().await;
        guard.log_out().await;
        guard.terminate(TerminationReason::IdleTimeout).await;

        let redirects = log
            .effects()
            .iter()
            .filter(|e| e.starts_with("redirect"))
            .count();
        assert_eq!(redirects, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminate_without_session_is_noop() {
        let (guard, log, _auth) = guard_with_log();
        guard.terminate(TerminationReason::Logout).await;
        assert!(log.effects().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_logout_does_not_stop_sequence() {
        let log = Arc::new(EffectLog::default());
        let auth = Arc::new(MockAuth {
            log: log.clone(),
            logins: AtomicUsize::new(0),
            fail_logout: true,
        });
        let guard = SessionGuard::new(
            GuardConfig::default(),
            auth,
            MockData::new(),
            Arc::new(MockSink),
            Arc::new(MockNavigator { log: log.clone() }),
        );
        guard.arm_session().await.unwrap();
        run_tasks().await;

        guard.log_out().await;
        assert!(log.effects().contains(&"redirect:/login".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_auth_rejected_fetch_terminates_session() {
        let log = Arc::new(EffectLog::default());
        let auth = MockAuth::new(log.clone());
        let data = MockData::new();
        let guard = SessionGuard::new(
            GuardConfig::default(),
            auth,
            data.clone(),
            Arc::new(MockSink),
            Arc::new(MockNavigator { log: log.clone() }),
        );
        guard.arm_session().await.unwrap();
        run_tasks().await;

        data.auth_rejected.store(true, Ordering::SeqCst);
        let list = guard.list_view("orders");
        list.refresh().await;

        assert!(guard.session().is_none());
        assert!(log.effects().contains(&"redirect:/login".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_list_controller_resets_on_termination() {
        let (guard, _log, _auth) = guard_with_log();
        guard.arm_session().await.unwrap();
        run_tasks().await;

        let list = guard.list_view("orders");
        list.refresh().await;
        assert_eq!(list.view_model().records.len(), 1);

        guard.log_out().await;
        let model = list.view_model();
        assert!(model.records.is_empty());
        assert!(!model.no_result);
        assert!(!model.is_loading);
    }
}
