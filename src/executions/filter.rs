use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

use crate::error::QueryError;
use crate::types::{Execution, ExecutionStatus, RangeQuery};

/// Typed predicate over the execution history.
///
/// Built incrementally by pure constructors and handed to a store, which
/// translates it into its own filter clauses. Absent fields impose no
/// constraint. Status values are carried as raw strings so that a filter may
/// name statuses this crate does not yet special-case; an unknown value
/// simply matches nothing.
///
/// `accessible_workflow_ids` is a security boundary: when present it is
/// always ANDed in, regardless of any `workflow_id` filter. A `workflow_id`
/// outside the scope therefore matches zero rows rather than erroring.
#[derive(Debug, Clone, Default)]
pub struct ExecutionFilter {
    pub statuses: Option<Vec<String>>,
    pub workflow_id: Option<String>,
    pub accessible_workflow_ids: Option<Vec<String>>,
    pub started_before: Option<DateTime<Utc>>,
    pub started_after: Option<DateTime<Utc>>,

    /// Exclusive upper id bound, set by the paginator from `last_id`.
    pub id_below: Option<i64>,
    /// Exclusive lower id bound, set by the paginator from `first_id`.
    pub id_above: Option<i64>,
}

impl ExecutionFilter {
    /// An open predicate with no security scope. Reserved for the
    /// privileged/administrative query paths.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// An otherwise-open predicate restricted to the given workflow scope.
    /// An empty scope matches zero rows.
    pub fn scoped_to(accessible_workflow_ids: Vec<String>) -> Self {
        Self {
            accessible_workflow_ids: Some(accessible_workflow_ids),
            ..Self::default()
        }
    }

    /// Restrict to executions whose status is in the given set.
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = ExecutionStatus>) -> Self {
        self.statuses = Some(statuses.into_iter().map(|s| s.as_str().to_string()).collect());
        self
    }

    /// Build the predicate for a range query. Date bounds are parsed and
    /// validated here, before any store access; cursor bounds are applied
    /// separately by the paginator.
    pub fn from_query(query: &RangeQuery) -> Result<Self, QueryError> {
        let mut filter = Self::scoped_to(query.accessible_workflow_ids.clone());
        filter.statuses = query.status.clone();
        filter.workflow_id = query.workflow_id.clone();
        filter.started_before = query
            .started_before
            .as_deref()
            .map(parse_date_bound)
            .transpose()?;
        filter.started_after = query
            .started_after
            .as_deref()
            .map(parse_date_bound)
            .transpose()?;
        Ok(filter)
    }

    /// Whether any dimension beyond the security scope narrows the scan.
    /// Counts over a narrowed scan must be exact; only an unnarrowed scan
    /// may substitute a statistical estimate.
    pub fn narrows(&self) -> bool {
        self.statuses.as_ref().is_some_and(|s| !s.is_empty())
            || self.workflow_id.is_some()
            || self.started_before.is_some()
            || self.started_after.is_some()
            || self.id_below.is_some()
            || self.id_above.is_some()
    }

    /// Evaluate the predicate against a single row. Used by the in-memory
    /// store; SQL stores translate the same semantics into WHERE clauses.
    pub fn matches(&self, execution: &Execution) -> bool {
        if let Some(scope) = &self.accessible_workflow_ids {
            if !scope.iter().any(|id| id == &execution.workflow_id) {
                return false;
            }
        }
        if let Some(statuses) = &self.statuses {
            // An empty status set imposes no constraint.
            if !statuses.is_empty() && !statuses.iter().any(|s| s == execution.status.as_str()) {
                return false;
            }
        }
        if let Some(workflow_id) = &self.workflow_id {
            if workflow_id != &execution.workflow_id {
                return false;
            }
        }
        if let Some(before) = self.started_before {
            match execution.started_at {
                Some(at) if at <= before => {}
                _ => return false,
            }
        }
        if let Some(after) = self.started_after {
            match execution.started_at {
                Some(at) if at >= after => {}
                _ => return false,
            }
        }
        if let Some(below) = self.id_below {
            if execution.id >= below {
                return false;
            }
        }
        if let Some(above) = self.id_above {
            if execution.id <= above {
                return false;
            }
        }
        true
    }
}

/// Parse a `startedBefore`/`startedAfter` bound.
///
/// Accepts an RFC 3339 timestamp, a naive `YYYY-MM-DD HH:MM:SS` timestamp,
/// or a bare `YYYY-MM-DD` date (interpreted as UTC midnight).
pub fn parse_date_bound(raw: &str) -> Result<DateTime<Utc>, QueryError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&dt));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)));
    }
    Err(QueryError::InvalidDateBound(raw.to_string()))
}
