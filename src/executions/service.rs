use std::sync::Arc;

use tracing::debug;

use crate::error::QueryError;
use crate::executions::filter::ExecutionFilter;
use crate::executions::summary::{summarize, ExecutionSummary};
use crate::store::{ExecutionStore, WorkflowDirectory};
use crate::types::{Execution, ExecutionStatus, RangeQuery, RangeResult};

/// Read-side query service over the execution history.
///
/// Stateless per call; all state lives in the injected store. Safe to share
/// and invoke concurrently. The count and the page of a range query are
/// read without cross-call locking: a row changing status between the two
/// reads is a tolerated, benign race.
pub struct ExecutionQueryService {
    store: Arc<dyn ExecutionStore>,
    directory: Arc<dyn WorkflowDirectory>,
}

impl ExecutionQueryService {
    pub fn new(store: Arc<dyn ExecutionStore>, directory: Arc<dyn WorkflowDirectory>) -> Self {
        Self { store, directory }
    }

    /// Up to `n` most recent finished (success or error) executions,
    /// newest-first, across all workflows.
    ///
    /// Administrative: no workflow scoping is applied. Caller-scoped access
    /// must go through [`find_range_with_count`](Self::find_range_with_count).
    pub async fn find_latest_finished(&self, n: i64) -> Result<Vec<Execution>, QueryError> {
        debug!(limit = n, "fetching latest finished executions");
        let filter = ExecutionFilter::unscoped().with_statuses(ExecutionStatus::FINISHED);
        let rows = self.store.fetch_filtered(&filter, Some(n)).await?;
        Ok(rows)
    }

    /// All executions currently in flight (new, running, or waiting), with
    /// no limit or pagination.
    ///
    /// Administrative: no workflow scoping is applied.
    pub async fn find_all_active(&self) -> Result<Vec<Execution>, QueryError> {
        debug!("fetching all active executions");
        let filter = ExecutionFilter::unscoped().with_statuses(ExecutionStatus::ACTIVE);
        let rows = self.store.fetch_filtered(&filter, None).await?;
        Ok(rows)
    }

    /// One page of a filtered range, plus the cursor/limit-independent
    /// count of everything the filter matches. Comparing `count` against
    /// cumulative rows retrieved tells a caller how many pages remain.
    ///
    /// Validation failures (malformed date bound, conflicting cursors) are
    /// raised before any store round-trip.
    pub async fn find_range_with_count(&self, query: &RangeQuery) -> Result<RangeResult, QueryError> {
        query.range.validate()?;
        let filter = ExecutionFilter::from_query(query)?;

        let resolved = self.store.count_filtered(&filter).await?;
        debug!(
            count = resolved.count,
            estimated = resolved.estimated,
            "resolved range count"
        );

        let rows = if query.range.is_empty_page() {
            Vec::new()
        } else {
            let page_filter = query.range.apply_to(filter);
            self.store
                .fetch_filtered(&page_filter, Some(query.range.limit))
                .await?
        };

        let results = self.project(&rows).await?;

        Ok(RangeResult {
            count: resolved.count,
            estimated: resolved.estimated,
            results,
        })
    }

    /// Join each row with its workflow's display name and project into the
    /// summary shape.
    async fn project(&self, rows: &[Execution]) -> Result<Vec<ExecutionSummary>, QueryError> {
        let mut workflow_ids: Vec<String> = rows.iter().map(|e| e.workflow_id.clone()).collect();
        workflow_ids.sort();
        workflow_ids.dedup();

        let names = self.directory.names_of(&workflow_ids).await?;

        Ok(rows
            .iter()
            .map(|execution| summarize(execution, names.get(&execution.workflow_id).cloned()))
            .collect())
    }
}
