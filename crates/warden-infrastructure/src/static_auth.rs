//! Static authentication provider.
//!
//! A reference `AuthProvider` that grants a fixed role set. Useful for
//! embedding behind a pre-authenticated proxy and as a test double; the
//! failure toggles simulate the transport faults the guard must recover
//! from.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use warden_core::error::{Result, WardenError};
use warden_core::session::{AuthProvider, Role, Session};

/// `AuthProvider` over a fixed role grant.
pub struct StaticAuthProvider {
    roles: RwLock<HashSet<Role>>,
    fail_login: AtomicBool,
    fail_roles: AtomicBool,
    fail_logout: AtomicBool,
    logout_calls: AtomicUsize,
}

impl StaticAuthProvider {
    /// Creates a provider granting the given roles.
    pub fn new(roles: HashSet<Role>) -> Self {
        Self {
            roles: RwLock::new(roles),
            fail_login: AtomicBool::new(false),
            fail_roles: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            logout_calls: AtomicUsize::new(0),
        }
    }

    /// Creates a provider granting the admin role only.
    pub fn admin() -> Self {
        Self::new(HashSet::from([Role::admin()]))
    }

    /// Replaces the granted role set.
    pub fn set_roles(&self, roles: HashSet<Role>) {
        *self.roles.write().unwrap() = roles;
    }

    /// Makes subsequent logins fail.
    pub fn set_fail_login(&self, fail: bool) {
        self.fail_login.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent role fetches fail.
    pub fn set_fail_roles(&self, fail: bool) {
        self.fail_roles.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent logout calls fail.
    pub fn set_fail_logout(&self, fail: bool) {
        self.fail_logout.store(fail, Ordering::SeqCst);
    }

    /// Number of logout calls observed.
    pub fn logout_calls(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthProvider for StaticAuthProvider {
    async fn login(&self) -> Result<Session> {
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(WardenError::auth("login rejected"));
        }
        let token = uuid::Uuid::new_v4().to_string();
        Ok(Session::new(token, self.roles.read().unwrap().clone()))
    }

    async fn logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(WardenError::transport("logout endpoint unreachable"));
        }
        Ok(())
    }

    async fn fetch_roles(&self, _token: &str) -> Result<HashSet<Role>> {
        if self.fail_roles.load(Ordering::SeqCst) {
            return Err(WardenError::transport("role endpoint unreachable"));
        }
        Ok(self.roles.read().unwrap().clone())
    }
}
