use thiserror::Error;

/// Failures surfaced by a store or directory backend.
///
/// Store unavailability is fatal to the current call and propagates
/// unmodified; retry policy, if any, belongs to the backend or an
/// outer layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failures surfaced by the query service.
///
/// Validation errors are raised before any store round-trip.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("invalid date bound: {0:?}")]
    InvalidDateBound(String),

    #[error("`lastId` and `firstId` are mutually exclusive cursors")]
    ConflictingCursors,

    #[error(transparent)]
    Store(#[from] StoreError),
}
