use crate::error::Result;
use crate::model::{CreatedUrl, HitCount, Resolution};
use async_trait::async_trait;
use linkstat_core::ShortCode;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Allocates a new identifier for `long_url` and returns its short code.
    ///
    /// The URL is stored as given. Submitting the same URL twice creates two
    /// mappings.
    async fn create_short_url(&self, long_url: &str) -> Result<CreatedUrl>;

    /// Looks up the URL behind `code` and counts the hit.
    ///
    /// Returns `Err(NotFound)` if the code is malformed or was never issued.
    async fn resolve(&self, code: &ShortCode) -> Result<Resolution>;

    /// Returns the hits of `code` in the current bucket of the named window.
    async fn get_hit_count(&self, code: &ShortCode, window: &str) -> Result<HitCount>;
}
