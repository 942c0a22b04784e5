//! Key layout of the persisted state.
//!
//! These names are shared with data written by earlier deployments and must
//! not change.

use crate::window::Window;

/// Sequence from which identifiers are allocated.
pub const SEQUENCE_KEY: &str = "urls:latest";

/// Registry of every bucket key that has been incremented.
pub const BUCKET_REGISTRY_KEY: &str = "known:";

/// The key holding the long URL for an identifier.
pub fn mapping_key(id: u64) -> String {
    format!("url.{id}.longurl")
}

/// The key of the counter hash for a window and resource.
///
/// Fields inside the hash are bucket start timestamps, see [`bucket_field`].
pub fn bucket_key(window: Window, resource: u64) -> String {
    format!("{}:{}", window.duration_secs(), resource)
}

/// The field for a bucket start timestamp.
pub fn bucket_field(bucket_start: i64) -> String {
    bucket_start.to_string()
}
