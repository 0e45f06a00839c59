//! Session domain models.
//!
//! This module contains the core Session entity that represents
//! an authenticated identity in the application's domain layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A role identifier controlling visibility of a UI region.
///
/// Roles are opaque strings; ordering is irrelevant and comparisons are
/// exact. The privileged role used by the deny-by-default gate posture is
/// configuration-driven, with [`Role::admin`] as the conventional default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    /// Creates a role from an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The conventional most-privileged role.
    pub fn admin() -> Self {
        Self("admin".to_string())
    }

    /// Returns the role identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Role {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The authenticated identity for the current browsing context.
///
/// A session holds the opaque authentication token and the role set
/// granted at login. It is created on successful login and destroyed on
/// termination (explicit logout, watchdog expiry, or token rejection).
/// The orchestrator owns the session exclusively; every other component
/// only reads it.
///
/// The role set carried here is the coarse grant returned by the login
/// call. Region gating never reads it directly; visibility decisions use
/// the asynchronously resolved
/// [`CapabilitySet`](crate::capability::CapabilitySet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque authentication token
    pub token: String,
    /// Roles granted at login
    pub roles: HashSet<Role>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
}

impl Session {
    /// Creates a new session stamped with the current time.
    pub fn new(token: impl Into<String>, roles: HashSet<Role>) -> Self {
        Self {
            token: token.into(),
            roles,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display_matches_identifier() {
        let role = Role::new("editor");
        assert_eq!(role.to_string(), "editor");
        assert_eq!(role.as_str(), "editor");
    }

    #[test]
    fn test_session_new_stamps_creation_time() {
        let session = Session::new("tok-1", HashSet::from([Role::admin()]));
        assert_eq!(session.token, "tok-1");
        assert!(!session.created_at.is_empty());
        assert!(session.roles.contains(&Role::admin()));
    }
}
