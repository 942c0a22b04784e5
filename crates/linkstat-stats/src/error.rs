use linkstat_core::{StoreError, UnknownWindow};
use thiserror::Error;

/// Result type for stats operations.
pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error(transparent)]
    UnknownWindow(#[from] UnknownWindow),
    #[error("counter store error: {0}")]
    Store(#[from] StoreError),
}
