use thiserror::Error;

/// Result type for counter store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failures reported by a [`CounterStore`](crate::CounterStore) backend.
///
/// The core never retries; these are surfaced to the caller unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),
    #[error("store operation timed out: {0}")]
    Timeout(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("store operation failed: {0}")]
    Operation(String),
}

/// A window name that is not one of the known counting windows.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown window: {0}")]
pub struct UnknownWindow(pub String);
