//! List view domain module.
//!
//! # Module Structure
//!
//! - `filter`: Fetch criteria models (`FilterCriteria`, `Pagination`, `SortSpec`)
//! - `state`: Resilience state machine (`ListState`, `ListSnapshot`)
//! - `provider`: Data-fetch collaborator trait (`DataProvider`, `ListPage`)

mod filter;
mod provider;
mod state;

// Re-export public API
pub use filter::{FilterCriteria, Pagination, SortDirection, SortSpec};
pub use provider::{DataProvider, ListPage};
pub use state::{ListPhase, ListSnapshot, ListState, SettleOutcome};
