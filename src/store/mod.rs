// Storage collaborators
//
// The query service is wired to two external collaborators by constructor
// injection: the execution store (row fetch, filtered counting, ordered id
// listing) and the workflow directory (display-name resolution). Both are
// object-safe async traits; this crate ships a Postgres implementation and
// an in-memory one.

pub mod memory;
pub mod postgres;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::executions::count::ResolvedCount;
use crate::executions::filter::ExecutionFilter;
use crate::types::Execution;

#[async_trait]
pub trait ExecutionStore: Send + Sync {
    /// Fetch rows matching the predicate, ordered by id descending,
    /// bounded to `limit` rows when given. A non-positive limit yields
    /// zero rows.
    async fn fetch_filtered(
        &self,
        filter: &ExecutionFilter,
        limit: Option<i64>,
    ) -> Result<Vec<Execution>, StoreError>;

    /// How many rows match the predicate, ignoring any limit. Exact unless
    /// the implementation substitutes an estimate for an unnarrowed scan.
    async fn count_filtered(&self, filter: &ExecutionFilter) -> Result<ResolvedCount, StoreError>;

    /// All execution ids in creation order. Used by callers establishing
    /// cursors, not by the query service itself.
    async fn list_ids_ordered(&self) -> Result<Vec<i64>, StoreError>;
}

#[async_trait]
pub trait WorkflowDirectory: Send + Sync {
    /// Resolve display names for the given workflow ids. Ids with no known
    /// name are simply absent from the result.
    async fn names_of(
        &self,
        workflow_ids: &[String],
    ) -> Result<HashMap<String, String>, StoreError>;
}
