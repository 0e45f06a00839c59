//! Capability state models.
//!
//! Contains the resolved role set for the current session together with
//! its tri-state loading status.

use crate::session::Role;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Loading status of the session's role set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleResolution {
    /// No session exists or no resolution has been started.
    Unresolved,
    /// A role fetch is in flight.
    Loading,
    /// Resolution finished; the role set is authoritative (possibly empty).
    Resolved,
}

/// The resolved set of role identifiers for the current session.
///
/// While the status is `Loading`, gated regions render nothing — never a
/// flash of denied or allowed content. A failed resolution settles to
/// `Resolved` with an empty role set (safe deny) rather than staying in
/// `Loading` forever.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilitySet {
    status: RoleResolution,
    roles: HashSet<Role>,
}

impl CapabilitySet {
    /// Creates an unresolved capability set (no session).
    pub fn unresolved() -> Self {
        Self {
            status: RoleResolution::Unresolved,
            roles: HashSet::new(),
        }
    }

    /// Creates a capability set with a role fetch in flight.
    pub fn loading() -> Self {
        Self {
            status: RoleResolution::Loading,
            roles: HashSet::new(),
        }
    }

    /// Creates a resolved capability set from fetched roles.
    pub fn resolved(roles: HashSet<Role>) -> Self {
        Self {
            status: RoleResolution::Resolved,
            roles,
        }
    }

    /// Creates a resolved-but-empty capability set.
    ///
    /// This is the failure→safe-deny settlement for a role fetch that
    /// errored out.
    pub fn resolved_empty() -> Self {
        Self::resolved(HashSet::new())
    }

    /// Returns the loading status.
    pub fn status(&self) -> RoleResolution {
        self.status
    }

    /// Returns the resolved roles (empty unless `Resolved`).
    pub fn roles(&self) -> &HashSet<Role> {
        &self.roles
    }

    /// Returns whether resolution has finished.
    pub fn is_resolved(&self) -> bool {
        self.status == RoleResolution::Resolved
    }

    /// Revokes the cached role set, returning to `Unresolved`.
    ///
    /// Called on session termination so subsequent gate checks suppress
    /// until the next login resolves roles again.
    pub fn revoke(&mut self) {
        self.status = RoleResolution::Unresolved;
        self.roles.clear();
    }
}

impl Default for CapabilitySet {
    fn default() -> Self {
        Self::unresolved()
    }
}
