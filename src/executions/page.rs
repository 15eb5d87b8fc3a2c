use crate::error::QueryError;
use crate::executions::filter::ExecutionFilter;
use crate::types::{Execution, ExecutionRange};

impl ExecutionRange {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            last_id: None,
            first_id: None,
        }
    }

    /// The two cursors are mutually exclusive; supplying both is a caller
    /// contract violation and is rejected deterministically rather than
    /// silently preferring one.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.last_id.is_some() && self.first_id.is_some() {
            return Err(QueryError::ConflictingCursors);
        }
        Ok(())
    }

    /// Fold the exclusive cursor bounds into a predicate. Cursor filtering
    /// composes with the other predicates, it does not replace them.
    pub fn apply_to(&self, mut filter: ExecutionFilter) -> ExecutionFilter {
        filter.id_below = self.last_id;
        filter.id_above = self.first_id;
        filter
    }

    /// A non-positive limit yields zero rows; an explicit policy choice,
    /// not an error.
    pub fn is_empty_page(&self) -> bool {
        self.limit <= 0
    }
}

/// Order rows newest-first by id. Pages are returned in this order
/// independent of cursor direction.
pub fn order_newest_first(rows: &mut [Execution]) {
    rows.sort_unstable_by(|a, b| b.id.cmp(&a.id));
}

/// Bound an ordered result set to at most `limit` rows. `None` means
/// unbounded; a non-positive limit yields zero rows.
pub fn truncate_to_limit(mut rows: Vec<Execution>, limit: Option<i64>) -> Vec<Execution> {
    match limit {
        Some(n) if n <= 0 => Vec::new(),
        Some(n) => {
            rows.truncate(n as usize);
            rows
        }
        None => rows,
    }
}
