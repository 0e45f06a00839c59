//! Data-fetch collaborator trait.
//!
//! Defines the interface for paginated list retrieval. The wire format
//! behind it is out of scope; records are opaque JSON rows.

use super::filter::{FilterCriteria, Pagination, SortSpec};
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// One page of list results.
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    /// Records in this window, in provider order.
    pub records: Vec<Value>,
    /// Total records matching the filter across all pages.
    pub total: u64,
}

/// An abstract paginated data provider for list views.
///
/// # Implementation Notes
///
/// Implementations should surface:
/// - `WardenError::Auth` on token rejection — the controller escalates
///   this to a full session termination
/// - `WardenError::Transport` on network/server failure — recovered
///   locally by retaining the last snapshot
///
/// Retries, if any, belong to the implementation; the guard never retries.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Fetches one page of a resource.
    ///
    /// # Arguments
    ///
    /// * `resource` - Logical resource name (e.g. "orders")
    /// * `filter` - Active filter criteria
    /// * `pagination` - 1-based page window
    /// * `sort` - Optional sort specification
    async fn fetch_list(
        &self,
        resource: &str,
        filter: &FilterCriteria,
        pagination: &Pagination,
        sort: Option<&SortSpec>,
    ) -> Result<ListPage>;
}
