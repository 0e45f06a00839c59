//! Session collaborator traits.
//!
//! Defines the interfaces the guard consumes for authentication and
//! navigation. Implementations live outside this subsystem (or in the
//! infrastructure crate for embedding and tests).

use super::model::{Role, Session};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// An abstract authentication and session provider.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Credential exchange and token issuance (`login`)
/// - Best-effort session invalidation (`logout`) — the guard never
///   retries a failed logout
/// - Role resolution for an issued token (`fetch_roles`)
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticates and returns a fresh session.
    ///
    /// # Returns
    ///
    /// - `Ok(Session)`: Authentication succeeded
    /// - `Err(_)`: Credentials were rejected or the transport failed
    async fn login(&self) -> Result<Session>;

    /// Invalidates the current session server-side, best-effort.
    ///
    /// Failures are logged by the caller and never retried; local
    /// termination proceeds regardless.
    async fn logout(&self) -> Result<()>;

    /// Resolves the role set for a token.
    ///
    /// # Returns
    ///
    /// - `Ok(roles)`: The resolved role identifiers
    /// - `Err(_)`: Resolution failed; the caller settles the capability
    ///   set to resolved-but-empty (safe deny)
    async fn fetch_roles(&self, token: &str) -> Result<HashSet<Role>>;
}

/// Side-effecting navigation collaborator.
///
/// The guard calls this exactly once per termination, after the query
/// cache has been cleared. No return value is consumed.
pub trait Navigator: Send + Sync {
    fn redirect(&self, target: &str);
}
