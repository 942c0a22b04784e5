use crate::error::Result;
use async_trait::async_trait;

/// The capabilities the shortener needs from its external key-value store.
///
/// Implementations must make [`allocate_next_id`] and [`increment_in_bucket`]
/// atomic with respect to concurrent callers. Nothing else is assumed beyond
/// read-your-writes for a single caller; no cross-key transactions are used.
///
/// [`allocate_next_id`]: CounterStore::allocate_next_id
/// [`increment_in_bucket`]: CounterStore::increment_in_bucket
#[async_trait]
pub trait CounterStore: Send + Sync + 'static {
    /// Increments the named sequence and returns the new value.
    ///
    /// A missing sequence starts from zero, so the first value is `1`.
    async fn allocate_next_id(&self, sequence: &str) -> Result<u64>;

    /// Sets the named sequence to `value` unless it already exists.
    ///
    /// Returns `true` if the write happened.
    async fn set_if_absent(&self, sequence: &str, value: u64) -> Result<bool>;

    /// Stores a value, replacing any previous one.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Adds `amount` to `field` of the counter hash `bucket_key` and records
    /// `bucket_key` in the `registry` set. Returns the new field value.
    async fn increment_in_bucket(
        &self,
        registry: &str,
        bucket_key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64>;

    /// Returns the value of `field` in the counter hash `bucket_key`, if any.
    async fn read_bucket_field(&self, bucket_key: &str, field: &str) -> Result<Option<i64>>;

    /// Lists the bucket keys recorded in `registry`, in lexicographic order.
    async fn registered_buckets(&self, registry: &str) -> Result<Vec<String>>;
}
