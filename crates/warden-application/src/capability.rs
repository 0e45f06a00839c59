//! Role resolution for the current session.
//!
//! This module provides `CapabilityResolver` which keeps the shared
//! `CapabilitySet` in step with asynchronously fetched role data, and
//! guards against out-of-order completions with a generation counter.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use warden_core::capability::CapabilitySet;
use warden_core::notify::{NotificationSink, Severity};
use warden_core::session::AuthProvider;

/// Resolves and caches the role set for the current session.
///
/// Every resolution is tagged with a monotonically increasing generation;
/// a completion whose generation is no longer current is discarded so a
/// stale role fetch can never overwrite a newer one. A failed fetch
/// settles the set to resolved-but-empty (safe deny) rather than leaving
/// gated regions suppressed forever.
pub struct CapabilityResolver {
    auth: Arc<dyn AuthProvider>,
    notifier: Arc<dyn NotificationSink>,
    capabilities: Arc<RwLock<CapabilitySet>>,
    generation: Arc<AtomicU64>,
}

impl CapabilityResolver {
    /// Creates a resolver in the unresolved state.
    pub fn new(auth: Arc<dyn AuthProvider>, notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            auth,
            notifier,
            capabilities: Arc::new(RwLock::new(CapabilitySet::unresolved())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Returns a snapshot of the current capability state.
    pub fn current(&self) -> CapabilitySet {
        self.capabilities.read().unwrap().clone()
    }

    /// Starts resolving roles for the given token.
    ///
    /// Supersedes any in-flight resolution: the older completion will be
    /// discarded when it eventually lands. The capability set reads
    /// `Loading` until this resolution settles.
    pub fn resolve(&self, token: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.capabilities.write().unwrap() = CapabilitySet::loading();

        let auth = self.auth.clone();
        let notifier = self.notifier.clone();
        let capabilities = self.capabilities.clone();
        let latest = self.generation.clone();
        let token = token.to_string();
        tokio::spawn(async move {
            let result = auth.fetch_roles(&token).await;

            let settled = {
                let mut capabilities = capabilities.write().unwrap();
                if latest.load(Ordering::SeqCst) != generation {
                    tracing::debug!("[CapabilityResolver] discarding stale role resolution");
                    return;
                }
                match result {
                    Ok(roles) => {
                        tracing::debug!("[CapabilityResolver] resolved {} role(s)", roles.len());
                        *capabilities = CapabilitySet::resolved(roles);
                        Ok(())
                    }
                    Err(err) => {
                        // Failure settles to an empty role set so the UI
                        // fails closed instead of freezing in Loading.
                        *capabilities = CapabilitySet::resolved_empty();
                        Err(err)
                    }
                }
            };

            if let Err(err) = settled {
                tracing::warn!("[CapabilityResolver] role resolution failed: {}", err);
                notifier.notify(
                    "Could not load permissions for this session",
                    Severity::Warning,
                );
            }
        });
    }

    /// Revokes the cached role set, returning to `Unresolved`.
    ///
    /// Also bumps the generation so any in-flight resolution is
    /// discarded on completion.
    pub fn revoke(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.capabilities.write().unwrap().revoke();
    }

    /// Resolves roles synchronously from an already-known set.
    ///
    /// Used by tests and embedders that have the roles at hand.
    pub fn resolve_known(&self, roles: HashSet<warden_core::session::Role>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.capabilities.write().unwrap() = CapabilitySet::resolved(roles);
    }
}
