use linkstat_core::StoreError;
use thiserror::Error;

/// Result type for shortener operations.
pub type Result<T> = std::result::Result<T, ShortenerError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShortenerError {
    /// The code does not decode to an identifier, or no URL is stored for it.
    #[error("short code not found: {0}")]
    NotFound(String),
    #[error("counter store error: {0}")]
    Store(#[from] StoreError),
}
