//! Postgres-backed store and directory.
//!
//! Filter predicates are translated into conditionally attached WHERE
//! clauses; only the dimensions actually present in the filter reach the
//! query. Pages are ordered by id descending, matching the creation-order
//! invariant of the BIGSERIAL primary key.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tracing::debug;

use crate::error::StoreError;
use crate::executions::count::{ResolvedCount, ESTIMATE_THRESHOLD};
use crate::executions::filter::ExecutionFilter;
use crate::store::{ExecutionStore, WorkflowDirectory};
use crate::types::Execution;

const EXECUTION_COLUMNS: &str =
    "id, workflow_id, status, mode, retry_of, retry_success_id, started_at, stopped_at, wait_till";

#[derive(Clone)]
pub struct PgExecutionStore {
    pool: PgPool,
}

impl PgExecutionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Planner row estimate for the executions table, from pg_class.
    /// Meaningless right after large churn until autovacuum catches up,
    /// which is why it is only consulted past the threshold.
    async fn estimated_total(&self) -> Result<Option<i64>, StoreError> {
        let estimate: Option<i64> = sqlx::query_scalar(
            "SELECT reltuples::BIGINT FROM pg_class WHERE oid = 'executions'::regclass",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(estimate)
    }
}

/// Attach one AND clause per present filter dimension.
fn push_filter<'qb>(query: &mut QueryBuilder<'qb, Postgres>, filter: &'qb ExecutionFilter) {
    if let Some(scope) = &filter.accessible_workflow_ids {
        query.push(" AND workflow_id = ANY(").push_bind(scope).push(")");
    }
    if let Some(statuses) = &filter.statuses {
        if !statuses.is_empty() {
            query.push(" AND status = ANY(").push_bind(statuses).push(")");
        }
    }
    if let Some(workflow_id) = &filter.workflow_id {
        query.push(" AND workflow_id = ").push_bind(workflow_id);
    }
    if let Some(before) = filter.started_before {
        query.push(" AND started_at <= ").push_bind(before);
    }
    if let Some(after) = filter.started_after {
        query.push(" AND started_at >= ").push_bind(after);
    }
    if let Some(below) = filter.id_below {
        query.push(" AND id < ").push_bind(below);
    }
    if let Some(above) = filter.id_above {
        query.push(" AND id > ").push_bind(above);
    }
}

fn execution_from_row(row: &PgRow) -> Execution {
    Execution {
        id: row.get("id"),
        workflow_id: row.get("workflow_id"),
        status: row.get("status"),
        mode: row.get("mode"),
        retry_of: row.get("retry_of"),
        retry_success_id: row.get("retry_success_id"),
        started_at: row.get("started_at"),
        stopped_at: row.get("stopped_at"),
        wait_till: row.get("wait_till"),
    }
}

#[async_trait]
impl ExecutionStore for PgExecutionStore {
    async fn fetch_filtered(
        &self,
        filter: &ExecutionFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Execution>, StoreError> {
        if matches!(limit, Some(n) if n <= 0) {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::new(format!(
            "SELECT {EXECUTION_COLUMNS} FROM executions WHERE 1=1"
        ));
        push_filter(&mut query, filter);
        query.push(" ORDER BY id DESC");
        if let Some(limit) = limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        debug!(sql = query.sql(), "fetching filtered executions");

        let rows = query.build().fetch_all(&self.pool).await?;
        Ok(rows.iter().map(execution_from_row).collect())
    }

    async fn count_filtered(&self, filter: &ExecutionFilter) -> Result<ResolvedCount, StoreError> {
        // Only an unnarrowed scan may substitute the planner estimate, and
        // only when the table is large enough for an exact count to hurt.
        if !filter.narrows() {
            if let Some(estimate) = self.estimated_total().await? {
                if estimate > ESTIMATE_THRESHOLD {
                    debug!(estimate, "using planner estimate for unfiltered count");
                    return Ok(ResolvedCount::estimated(estimate));
                }
            }
        }

        let mut query = QueryBuilder::new("SELECT COUNT(*) FROM executions WHERE 1=1");
        push_filter(&mut query, filter);

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(ResolvedCount::exact(count))
    }

    async fn list_ids_ordered(&self) -> Result<Vec<i64>, StoreError> {
        let ids = sqlx::query_scalar("SELECT id FROM executions ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }
}

#[derive(Clone)]
pub struct PgWorkflowDirectory {
    pool: PgPool,
}

impl PgWorkflowDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkflowDirectory for PgWorkflowDirectory {
    async fn names_of(
        &self,
        workflow_ids: &[String],
    ) -> Result<HashMap<String, String>, StoreError> {
        if workflow_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query("SELECT id, name FROM workflows WHERE id = ANY($1)")
            .bind(workflow_ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| (row.get("id"), row.get("name")))
            .collect())
    }
}
