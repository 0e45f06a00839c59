//! Fetch criteria models for list views.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter criteria for a list fetch, keyed by field name.
///
/// Blank values are inert: a criterion whose value is empty or whitespace
/// does not count as active. The distinction matters because an empty
/// result under an *active* filter means "no match", while an empty
/// result with no active filter is a legitimately empty data set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterCriteria {
    criteria: BTreeMap<String, String>,
}

impl FilterCriteria {
    /// Creates an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper: returns the filter with one criterion set.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a criterion.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.criteria.insert(field.into(), value.into());
    }

    /// Removes a criterion.
    pub fn remove(&mut self, field: &str) {
        self.criteria.remove(field);
    }

    /// Returns the value for a field, if set.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.criteria.get(field).map(String::as_str)
    }

    /// Clears all criteria.
    pub fn clear(&mut self) {
        self.criteria.clear();
    }

    /// Returns whether at least one criterion is active (non-blank).
    pub fn is_active(&self) -> bool {
        self.criteria.values().any(|value| !value.trim().is_empty())
    }

    /// Iterates over the criteria.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.criteria
            .iter()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }
}

/// 1-based pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    /// Creates a pagination window.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// The first page with the given page size.
    pub fn first(per_page: u32) -> Self {
        Self::new(1, per_page)
    }

    /// Zero-based record offset of this window.
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.per_page as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::first(25)
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort specification for a list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Creates a sort spec.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}
