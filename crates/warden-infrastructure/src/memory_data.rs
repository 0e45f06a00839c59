//! In-memory data provider.
//!
//! A reference `DataProvider` over JSON rows held in memory, with the
//! filter/sort/paginate semantics of a typical CRUD backend. Useful for
//! demos and as a test double; the failure toggles simulate transport
//! faults and token rejection.

use async_trait::async_trait;
use serde_json::Value;
use std::cmp::Ordering as CmpOrdering;
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};
use warden_core::error::{Result, WardenError};
use warden_core::list::{DataProvider, FilterCriteria, ListPage, Pagination, SortDirection, SortSpec};

/// `DataProvider` over in-memory JSON rows, keyed by resource name.
#[derive(Default)]
pub struct InMemoryDataProvider {
    resources: RwLock<HashMap<String, Vec<Value>>>,
    fail_transport: AtomicBool,
    fail_auth: AtomicBool,
}

impl InMemoryDataProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the rows for a resource.
    pub fn set_rows(&self, resource: impl Into<String>, rows: Vec<Value>) {
        self.resources.write().unwrap().insert(resource.into(), rows);
    }

    /// Makes subsequent fetches fail with a transport error.
    pub fn set_fail_transport(&self, fail: bool) {
        self.fail_transport.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent fetches fail with an auth rejection.
    pub fn set_fail_auth(&self, fail: bool) {
        self.fail_auth.store(fail, Ordering::SeqCst);
    }

    fn matches(row: &Value, filter: &FilterCriteria) -> bool {
        filter.iter().all(|(field, wanted)| {
            if wanted.trim().is_empty() {
                return true;
            }
            match row.get(field) {
                Some(value) => {
                    let haystack = match value {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    haystack.to_lowercase().contains(&wanted.trim().to_lowercase())
                }
                None => false,
            }
        })
    }

    fn compare(a: &Value, b: &Value, field: &str) -> CmpOrdering {
        let left = a.get(field);
        let right = b.get(field);
        match (left, right) {
            (Some(Value::Number(l)), Some(Value::Number(r))) => l
                .as_f64()
                .partial_cmp(&r.as_f64())
                .unwrap_or(CmpOrdering::Equal),
            (Some(l), Some(r)) => {
                let l = match l {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                let r = match r {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                l.cmp(&r)
            }
            (Some(_), None) => CmpOrdering::Less,
            (None, Some(_)) => CmpOrdering::Greater,
            (None, None) => CmpOrdering::Equal,
        }
    }
}

#[async_trait]
impl DataProvider for InMemoryDataProvider {
    async fn fetch_list(
        &self,
        resource: &str,
        filter: &FilterCriteria,
        pagination: &Pagination,
        sort: Option<&SortSpec>,
    ) -> Result<ListPage> {
        if self.fail_auth.load(Ordering::SeqCst) {
            return Err(WardenError::auth("token rejected"));
        }
        if self.fail_transport.load(Ordering::SeqCst) {
            return Err(WardenError::transport("backend unreachable"));
        }

        let resources = self.resources.read().unwrap();
        let rows = resources.get(resource).cloned().unwrap_or_default();
        drop(resources);

        let mut matched: Vec<Value> = rows
            .into_iter()
            .filter(|row| Self::matches(row, filter))
            .collect();

        if let Some(sort) = sort {
            matched.sort_by(|a, b| {
                let ordering = Self::compare(a, b, &sort.field);
                match sort.direction {
                    SortDirection::Ascending => ordering,
                    SortDirection::Descending => ordering.reverse(),
                }
            });
        }

        let total = matched.len() as u64;
        let records = matched
            .into_iter()
            .skip(pagination.offset())
            .take(pagination.per_page as usize)
            .collect();

        Ok(ListPage { records, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider_with_people() -> InMemoryDataProvider {
        let provider = InMemoryDataProvider::new();
        provider.set_rows(
            "people",
            vec![
                json!({ "id": 1, "name": "Ada" }),
                json!({ "id": 2, "name": "Grace" }),
                json!({ "id": 3, "name": "Adele" }),
            ],
        );
        provider
    }

    #[tokio::test]
    async fn test_filter_matches_substring_case_insensitive() {
        let provider = provider_with_people();
        let page = provider
            .fetch_list(
                "people",
                &FilterCriteria::new().with("name", "ad"),
                &Pagination::first(10),
                None,
            )
            .await
            .unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.records.len(), 2);
    }

    #[tokio::test]
    async fn test_unmatched_filter_returns_empty() {
        let provider = provider_with_people();
        let page = provider
            .fetch_list(
                "people",
                &FilterCriteria::new().with("name", "xyz"),
                &Pagination::first(10),
                None,
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn test_sort_and_paginate() {
        let provider = provider_with_people();
        let page = provider
            .fetch_list(
                "people",
                &FilterCriteria::new(),
                &Pagination::new(2, 2),
                Some(&SortSpec::new("name", SortDirection::Ascending)),
            )
            .await
            .unwrap();
        // Ada, Adele, Grace -> page 2 of 2 holds Grace.
        assert_eq!(page.total, 3);
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0]["name"], "Grace");
    }

    #[tokio::test]
    async fn test_unknown_resource_is_empty_not_error() {
        let provider = InMemoryDataProvider::new();
        let page = provider
            .fetch_list(
                "missing",
                &FilterCriteria::new(),
                &Pagination::first(10),
                None,
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_failure_toggles() {
        let provider = provider_with_people();

        provider.set_fail_transport(true);
        let err = provider
            .fetch_list("people", &FilterCriteria::new(), &Pagination::first(10), None)
            .await
            .unwrap_err();
        assert!(err.is_transport());

        provider.set_fail_auth(true);
        let err = provider
            .fetch_list("people", &FilterCriteria::new(), &Pagination::first(10), None)
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }
}
