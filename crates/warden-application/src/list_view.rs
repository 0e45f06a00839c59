//! Async list view controller.
//!
//! Drives the `ListState` machine from `warden-core` against the data
//! provider: issues generation-tagged fetches, discards superseded
//! completions, retains the last good snapshot across transient empties
//! and failures, and surfaces the one-shot advisories.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use warden_core::list::{DataProvider, FilterCriteria, ListState, Pagination, SortSpec};
use warden_core::notify::{NotificationSink, Severity};

use crate::session_guard::{SessionGuard, TerminationReason};

/// Render-ready projection of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListViewModel {
    /// Records available for rendering (the retained snapshot).
    pub records: Vec<serde_json::Value>,
    /// Total matching records reported with the snapshot.
    pub total: u64,
    /// Whether a fetch is in flight.
    pub is_loading: bool,
    /// True only when a completed fetch matched nothing under an active
    /// filter.
    pub no_result: bool,
}

/// State shared with the termination observer registered by the guard.
pub(crate) struct ListViewShared {
    state: RwLock<ListState>,
    pagination: RwLock<Pagination>,
    sort: RwLock<Option<SortSpec>>,
    generation: AtomicU64,
}

impl ListViewShared {
    /// Reverts to the neutral state when the backing session goes away,
    /// superseding any in-flight fetch.
    pub(crate) fn detach(&self, per_page: u32) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.write().unwrap().reset();
        *self.pagination.write().unwrap() = Pagination::first(per_page);
        *self.sort.write().unwrap() = None;
    }
}

/// Controller for one paginated list view.
///
/// All fetch-triggering operations supersede an in-flight fetch rather
/// than queueing behind it: every fetch carries a generation number and a
/// completion whose generation is stale mutates nothing.
pub struct ListViewController {
    resource: String,
    data: Arc<dyn DataProvider>,
    notifier: Arc<dyn NotificationSink>,
    guard: SessionGuard,
    shared: Arc<ListViewShared>,
}

impl ListViewController {
    pub(crate) fn new(
        resource: String,
        data: Arc<dyn DataProvider>,
        notifier: Arc<dyn NotificationSink>,
        guard: SessionGuard,
        per_page: u32,
    ) -> Self {
        Self {
            resource,
            data,
            notifier,
            guard,
            shared: Arc::new(ListViewShared {
                state: RwLock::new(ListState::new()),
                pagination: RwLock::new(Pagination::first(per_page)),
                sort: RwLock::new(None),
                generation: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn shared(&self) -> &Arc<ListViewShared> {
        &self.shared
    }

    /// The resource this controller fetches.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Applies new filter criteria and re-fetches from page 1.
    pub async fn apply_filter(&self, filter: FilterCriteria) {
        self.rewind_to_first_page();
        self.run_fetch(filter).await;
    }

    /// Re-fetches the current page with unchanged criteria.
    pub async fn refresh(&self) {
        let filter = self.shared.state.read().unwrap().filter().clone();
        self.run_fetch(filter).await;
    }

    /// Clears all filter criteria, returns to page 1 and re-fetches.
    pub async fn reset_filters(&self) {
        self.rewind_to_first_page();
        self.run_fetch(FilterCriteria::new()).await;
    }

    /// Moves to the given page and re-fetches.
    pub async fn set_page(&self, page: u32) {
        {
            let mut pagination = self.shared.pagination.write().unwrap();
            *pagination = Pagination::new(page, pagination.per_page);
        }
        self.refresh().await;
    }

    /// Changes the sort order, returns to page 1 and re-fetches.
    pub async fn set_sort(&self, sort: Option<SortSpec>) {
        *self.shared.sort.write().unwrap() = sort;
        self.rewind_to_first_page();
        self.refresh().await;
    }

    /// Current render-ready projection.
    pub fn view_model(&self) -> ListViewModel {
        let state = self.shared.state.read().unwrap();
        ListViewModel {
            records: state.records().to_vec(),
            total: state.snapshot().map(|s| s.total).unwrap_or(0),
            is_loading: state.is_loading(),
            no_result: state.no_result(),
        }
    }

    /// Current pagination window.
    pub fn pagination(&self) -> Pagination {
        *self.shared.pagination.read().unwrap()
    }

    fn rewind_to_first_page(&self) {
        let mut pagination = self.shared.pagination.write().unwrap();
        *pagination = Pagination::first(pagination.per_page);
    }

    async fn run_fetch(&self, filter: FilterCriteria) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared
            .state
            .write()
            .unwrap()
            .begin_fetch(filter.clone());
        let pagination = *self.shared.pagination.read().unwrap();
        let sort = self.shared.sort.read().unwrap().clone();

        let result = self
            .data
            .fetch_list(&self.resource, &filter, &pagination, sort.as_ref())
            .await;

        match result {
            Ok(page) => {
                let outcome = {
                    let mut state = self.shared.state.write().unwrap();
                    if self.shared.generation.load(Ordering::SeqCst) != generation {
                        tracing::debug!(
                            "[ListViewController] discarding superseded fetch for '{}'",
                            self.resource
                        );
                        return;
                    }
                    state.settle(page.records, page.total)
                };
                if outcome.no_result_advisory {
                    self.notifier
                        .notify("No records matched the current filter", Severity::Info);
                }
            }
            Err(err) if err.is_auth() => {
                if self.shared.generation.load(Ordering::SeqCst) != generation {
                    return;
                }
                tracing::warn!(
                    "[ListViewController] fetch for '{}' rejected: {}",
                    self.resource,
                    err
                );
                self.guard.terminate(TerminationReason::AuthRejected).await;
            }
            Err(err) => {
                let superseded = {
                    let mut state = self.shared.state.write().unwrap();
                    if self.shared.generation.load(Ordering::SeqCst) != generation {
                        true
                    } else {
                        state.fetch_failed();
                        false
                    }
                };
                if !superseded {
                    tracing::warn!(
                        "[ListViewController] fetch for '{}' failed: {}",
                        self.resource,
                        err
                    );
                    self.notifier.notify(
                        "Could not refresh the list; showing the last loaded results",
                        Severity::Warning,
                    );
                }
            }
        }
    }
}
