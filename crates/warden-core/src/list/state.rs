//! List resilience state machine.
//!
//! Keeps the last known-good list payload across transient empty and
//! loading states, and distinguishes "no results matched the filter"
//! from "this data set is empty" and "still loading". The machine is
//! synchronous and owns no I/O; the async controller in the application
//! layer drives it and acts on the returned outcomes.

use super::filter::FilterCriteria;
use serde_json::Value;

/// Phase of a list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPhase {
    /// No fetch has run yet (or the view was reset).
    Idle,
    /// A fetch is in flight; the previous snapshot stays presentable.
    Loading,
    /// Settled with at least one record.
    Populated,
    /// Settled empty with no active filter: a legitimately empty data set.
    Empty,
    /// Settled empty under an active filter: the user searched for
    /// something that does not exist.
    NoResult,
}

/// The last accepted list payload, retained for resilient rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot {
    /// Records of the last non-transient result.
    pub records: Vec<Value>,
    /// Total matching records reported by the provider.
    pub total: u64,
    /// Filter criteria that produced this payload.
    pub filter: FilterCriteria,
}

/// What the caller must do after a fetch settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SettleOutcome {
    /// Surface the one-shot "no results matched" advisory.
    pub no_result_advisory: bool,
}

/// State machine for one list view.
///
/// Invariants:
/// - The snapshot is only replaced by a fetch that settles with at least
///   one record, or by a settle under an empty (inactive) filter. A
///   momentary empty result under an unchanged active filter never
///   overwrites a non-empty snapshot.
/// - The no-result flag is never raised while a fetch is in flight.
/// - The no-result advisory fires once per transition into `NoResult`
///   and re-arms only after the flag has settled back to false (a
///   populated or empty-filter settle, a filter change, or a reset).
///   Re-entering the same empty result on an unchanged filter stays
///   silent.
#[derive(Debug, Clone)]
pub struct ListState {
    phase: ListPhase,
    snapshot: Option<ListSnapshot>,
    filter: FilterCriteria,
    advisory_armed: bool,
}

impl ListState {
    /// Creates an idle state with no snapshot.
    pub fn new() -> Self {
        Self {
            phase: ListPhase::Idle,
            snapshot: None,
            filter: FilterCriteria::new(),
            advisory_armed: true,
        }
    }

    /// Begins a fetch with the given criteria.
    ///
    /// Any filter change (including clearing to an empty filter) re-arms
    /// the one-shot advisory; re-fetching unchanged criteria does not.
    pub fn begin_fetch(&mut self, filter: FilterCriteria) {
        if filter != self.filter {
            self.advisory_armed = true;
            self.filter = filter;
        }
        self.phase = ListPhase::Loading;
    }

    /// Settles the in-flight fetch with the provider's result.
    pub fn settle(&mut self, records: Vec<Value>, total: u64) -> SettleOutcome {
        if !records.is_empty() {
            self.snapshot = Some(ListSnapshot {
                records,
                total,
                filter: self.filter.clone(),
            });
            self.phase = ListPhase::Populated;
            self.advisory_armed = true;
            SettleOutcome {
                no_result_advisory: false,
            }
        } else if self.filter.is_active() {
            // Zero records under an active filter: the prior snapshot is
            // deliberately retained for rendering behind the notice.
            self.phase = ListPhase::NoResult;
            let advise = self.advisory_armed;
            self.advisory_armed = false;
            SettleOutcome {
                no_result_advisory: advise,
            }
        } else {
            // Zero records, no filter: the data set really is empty.
            self.snapshot = Some(ListSnapshot {
                records: Vec::new(),
                total: 0,
                filter: self.filter.clone(),
            });
            self.phase = ListPhase::Empty;
            self.advisory_armed = true;
            SettleOutcome {
                no_result_advisory: false,
            }
        }
    }

    /// Records a failed fetch.
    ///
    /// The snapshot is untouched; the phase falls back to whatever the
    /// retained snapshot supports so the view keeps presenting the last
    /// good payload.
    pub fn fetch_failed(&mut self) {
        self.phase = match &self.snapshot {
            Some(snapshot) if !snapshot.records.is_empty() => ListPhase::Populated,
            Some(_) => ListPhase::Empty,
            None => ListPhase::Idle,
        };
    }

    /// Returns to the pristine idle state, dropping the snapshot.
    ///
    /// Used when the backing session goes away.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current phase.
    pub fn phase(&self) -> ListPhase {
        self.phase
    }

    /// Active filter criteria.
    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// The retained snapshot, if any settled fetch produced one.
    pub fn snapshot(&self) -> Option<&ListSnapshot> {
        self.snapshot.as_ref()
    }

    /// Records available for rendering (the retained snapshot's records,
    /// regardless of phase).
    pub fn records(&self) -> &[Value] {
        self.snapshot
            .as_ref()
            .map(|snapshot| snapshot.records.as_slice())
            .unwrap_or(&[])
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    /// The derived no-result flag: true only when a fetch completed with
    /// zero records under an active filter. Never true mid-flight.
    pub fn no_result(&self) -> bool {
        self.phase == ListPhase::NoResult
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}
