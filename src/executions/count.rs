use serde::{Deserialize, Serialize};

/// A store may only substitute a statistical estimate for an unnarrowed
/// scan whose estimate exceeds this many rows; anything smaller, or any
/// narrowed scan, gets an exact count.
pub const ESTIMATE_THRESHOLD: i64 = 100_000;

/// How many records match a filter, ignoring limit and cursor.
///
/// `estimated = true` marks a statistical count taken in place of an exact
/// scan; callers must treat it as a lower-confidence bound, not a precise
/// total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCount {
    pub count: i64,
    pub estimated: bool,
}

impl ResolvedCount {
    pub fn exact(count: i64) -> Self {
        Self {
            count,
            estimated: false,
        }
    }

    pub fn estimated(count: i64) -> Self {
        Self {
            count,
            estimated: true,
        }
    }
}
