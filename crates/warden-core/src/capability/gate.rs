//! Deny-by-default visibility gate.

use super::model::{CapabilitySet, RoleResolution};
use crate::session::Role;

/// Visibility decision for a gated UI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Render nothing: roles are not resolved yet. Distinct from `Hidden`
    /// so callers never flash denied content that flips to allowed once
    /// roles arrive.
    Suppress,
    /// Access affirmatively granted.
    Visible,
    /// Access affirmatively denied.
    Hidden,
}

impl Visibility {
    /// Returns true only for an affirmative grant.
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// Decides region visibility from the current capability state.
///
/// Policy:
/// - `Unresolved` or `Loading` status suppresses the region entirely.
/// - Once resolved, the region is visible iff the intersection of the
///   session's roles and the required roles is non-empty.
/// - An empty required-role list protects rather than exposes: only the
///   configured privileged role passes.
#[derive(Debug, Clone)]
pub struct CapabilityGate {
    privileged: Role,
}

impl CapabilityGate {
    /// Creates a gate with the given privileged role.
    pub fn new(privileged: Role) -> Self {
        Self { privileged }
    }

    /// Evaluates visibility of a region requiring any of `required`.
    pub fn visibility(&self, required: &[Role], caps: &CapabilitySet) -> Visibility {
        match caps.status() {
            RoleResolution::Unresolved | RoleResolution::Loading => Visibility::Suppress,
            RoleResolution::Resolved => {
                let granted = if required.is_empty() {
                    // Unspecified access requirements fall back to the
                    // privileged role only.
                    caps.roles().contains(&self.privileged)
                } else {
                    required.iter().any(|role| caps.roles().contains(role))
                };
                if granted {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                }
            }
        }
    }
}

impl Default for CapabilityGate {
    fn default() -> Self {
        Self::new(Role::admin())
    }
}
