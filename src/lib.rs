pub mod config;
pub mod db;
pub mod error;
pub mod executions;
pub mod store;
pub mod types;

// Re-export main types
pub use error::{QueryError, StoreError};
pub use executions::service::ExecutionQueryService;
pub use executions::summary::ExecutionSummary;
pub use types::*;
