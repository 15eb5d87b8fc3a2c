use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Execution, ExecutionStatus};

/// Fixed-width, zero-padded, millisecond-precision UTC, no timezone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Read-only projection of an execution row joined with its workflow's
/// display name, the shape handed to external consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionSummary {
    pub id: i64,
    pub workflow_id: String,
    pub workflow_name: Option<String>,
    pub mode: String,
    pub retry_of: Option<i64>,
    pub status: ExecutionStatus,
    pub started_at: Option<String>,
    pub stopped_at: Option<String>,
    pub wait_till: Option<DateTime<Utc>>,
    pub retry_success_id: Option<i64>,
}

/// Project a raw row into its summary. Pure mapping, no I/O; absent
/// timestamps stay absent rather than becoming empty strings.
pub fn summarize(execution: &Execution, workflow_name: Option<String>) -> ExecutionSummary {
    ExecutionSummary {
        id: execution.id,
        workflow_id: execution.workflow_id.clone(),
        workflow_name,
        mode: execution.mode.clone(),
        retry_of: execution.retry_of,
        status: execution.status,
        started_at: execution.started_at.map(format_timestamp),
        stopped_at: execution.stopped_at.map(format_timestamp),
        wait_till: execution.wait_till,
        retry_success_id: execution.retry_success_id,
    }
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
