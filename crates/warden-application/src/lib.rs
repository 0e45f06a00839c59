//! Orchestration layer for the Warden guard.
//!
//! Composes the domain components from `warden-core` into the services
//! the rest of the application talks to: the [`SessionGuard`]
//! orchestrator, the [`CapabilityResolver`] and the
//! [`ListViewController`].

mod capability;
mod list_view;
mod session_guard;

pub use capability::CapabilityResolver;
pub use list_view::{ListViewController, ListViewModel};
pub use session_guard::{SessionGuard, TerminationCallback, TerminationReason};
