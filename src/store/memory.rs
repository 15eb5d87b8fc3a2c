//! In-memory store and directory.
//!
//! Backs the test suite and embedders that don't need a database. Ids are
//! assigned monotonically in insertion order, matching the creation-order
//! invariant the pagination contract relies on. Counts are always exact.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::StoreError;
use crate::executions::count::ResolvedCount;
use crate::executions::filter::ExecutionFilter;
use crate::executions::page;
use crate::store::{ExecutionStore, WorkflowDirectory};
use crate::types::{Execution, ExecutionStatus};

/// Seed row for [`InMemoryExecutionStore::insert`]; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewExecution {
    pub workflow_id: String,
    pub status: ExecutionStatus,
    pub mode: String,
    pub retry_of: Option<i64>,
    pub retry_success_id: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub wait_till: Option<DateTime<Utc>>,
}

impl NewExecution {
    pub fn new(workflow_id: impl Into<String>, status: ExecutionStatus) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            status,
            mode: "manual".to_string(),
            retry_of: None,
            retry_success_id: None,
            started_at: Some(Utc::now()),
            stopped_at: Some(Utc::now()),
            wait_till: None,
        }
    }
}

pub struct InMemoryExecutionStore {
    rows: RwLock<Vec<Execution>>,
    next_id: AtomicI64,
}

impl Default for InMemoryExecutionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryExecutionStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a row, assigning the next id in creation order.
    pub fn insert(&self, new: NewExecution) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let execution = Execution {
            id,
            workflow_id: new.workflow_id,
            status: new.status,
            mode: new.mode,
            retry_of: new.retry_of,
            retry_success_id: new.retry_success_id,
            started_at: new.started_at,
            stopped_at: new.stopped_at,
            wait_till: new.wait_till,
        };
        self.rows.write().expect("executions lock poisoned").push(execution);
        id
    }
}

#[async_trait]
impl ExecutionStore for InMemoryExecutionStore {
    async fn fetch_filtered(
        &self,
        filter: &ExecutionFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Execution>, StoreError> {
        let rows = self.rows.read().expect("executions lock poisoned");
        let mut matched: Vec<Execution> = rows.iter().filter(|e| filter.matches(e)).cloned().collect();
        page::order_newest_first(&mut matched);
        Ok(page::truncate_to_limit(matched, limit))
    }

    async fn count_filtered(&self, filter: &ExecutionFilter) -> Result<ResolvedCount, StoreError> {
        let rows = self.rows.read().expect("executions lock poisoned");
        let count = rows.iter().filter(|e| filter.matches(e)).count() as i64;
        Ok(ResolvedCount::exact(count))
    }

    async fn list_ids_ordered(&self) -> Result<Vec<i64>, StoreError> {
        let rows = self.rows.read().expect("executions lock poisoned");
        let mut ids: Vec<i64> = rows.iter().map(|e| e.id).collect();
        ids.sort_unstable();
        Ok(ids)
    }
}

#[derive(Default)]
pub struct InMemoryWorkflowDirectory {
    names: RwLock<HashMap<String, String>>,
}

impl InMemoryWorkflowDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_names(names: HashMap<String, String>) -> Self {
        Self {
            names: RwLock::new(names),
        }
    }

    pub fn register(&self, workflow_id: impl Into<String>, name: impl Into<String>) {
        self.names
            .write()
            .expect("directory lock poisoned")
            .insert(workflow_id.into(), name.into());
    }
}

#[async_trait]
impl WorkflowDirectory for InMemoryWorkflowDirectory {
    async fn names_of(
        &self,
        workflow_ids: &[String],
    ) -> Result<HashMap<String, String>, StoreError> {
        let names = self.names.read().expect("directory lock poisoned");
        Ok(workflow_ids
            .iter()
            .filter_map(|id| names.get(id).map(|name| (id.clone(), name.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ids_are_monotonic_in_insertion_order() {
        let store = InMemoryExecutionStore::new();
        let a = store.insert(NewExecution::new("w1", ExecutionStatus::Success));
        let b = store.insert(NewExecution::new("w1", ExecutionStatus::Error));
        let c = store.insert(NewExecution::new("w2", ExecutionStatus::Running));
        assert!(a < b && b < c);

        let ids = store.list_ids_ordered().await.unwrap();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_directory_omits_unknown_ids() {
        let directory = InMemoryWorkflowDirectory::new();
        directory.register("w1", "First");

        let names = directory
            .names_of(&["w1".to_string(), "w2".to_string()])
            .await
            .unwrap();
        assert_eq!(names.get("w1").map(String::as_str), Some("First"));
        assert!(!names.contains_key("w2"));
    }
}
