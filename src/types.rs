use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::executions::summary::ExecutionSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    New,
    Running,
    Success,
    Error,
    Waiting,
    Unknown,
    Canceled,
}

impl ExecutionStatus {
    /// Terminal statuses: the execution has run to completion, one way or the other.
    pub const FINISHED: [ExecutionStatus; 2] = [ExecutionStatus::Success, ExecutionStatus::Error];

    /// In-flight statuses: the execution has not yet reached a terminal state.
    pub const ACTIVE: [ExecutionStatus; 3] = [
        ExecutionStatus::New,
        ExecutionStatus::Running,
        ExecutionStatus::Waiting,
    ];

    pub fn is_finished(self) -> bool {
        Self::FINISHED.contains(&self)
    }

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExecutionStatus::New => "new",
            ExecutionStatus::Running => "running",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Waiting => "waiting",
            ExecutionStatus::Unknown => "unknown",
            ExecutionStatus::Canceled => "canceled",
        }
    }
}

/// One recorded run of a workflow.
///
/// `id` is assigned once by the store, monotonically increasing in creation
/// order. All range and cursor semantics are defined in terms of `id`, not
/// wall-clock time, since two executions may share a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: i64,
    pub workflow_id: String,
    pub status: ExecutionStatus,

    /// Trigger origin (manual, webhook, schedule, retry, ...). Opaque here.
    pub mode: String,

    pub retry_of: Option<i64>,
    pub retry_success_id: Option<i64>,

    pub started_at: Option<DateTime<Utc>>,
    pub stopped_at: Option<DateTime<Utc>>,
    pub wait_till: Option<DateTime<Utc>>,
}

/// A filtered range request against the execution history.
///
/// `accessible_workflow_ids` is the caller's security scope and is always
/// applied; a `workflow_id` outside it yields a valid empty result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    #[serde(default)]
    pub status: Option<Vec<String>>,

    #[serde(default)]
    pub workflow_id: Option<String>,

    pub accessible_workflow_ids: Vec<String>,

    #[serde(default)]
    pub started_before: Option<String>,

    #[serde(default)]
    pub started_after: Option<String>,

    pub range: ExecutionRange,
}

/// One page of a range query: a required limit plus at most one exclusive
/// cursor. `last_id` walks backward (rows with `id < last_id`), `first_id`
/// selects everything newer (rows with `id > first_id`). Pages always come
/// back newest-first regardless of cursor direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRange {
    pub limit: i64,

    #[serde(default)]
    pub last_id: Option<i64>,

    #[serde(default)]
    pub first_id: Option<i64>,
}

/// Result of a range query: the page plus the cursor/limit-independent
/// count of everything the filter matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeResult {
    pub count: i64,
    pub estimated: bool,
    pub results: Vec<ExecutionSummary>,
}
