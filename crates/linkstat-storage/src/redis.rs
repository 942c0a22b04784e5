use async_trait::async_trait;
use linkstat_core::{CounterStore, Result, StoreError};
use redis::AsyncCommands;
use tracing::{debug, trace, warn};

/// Hash field that holds the value of a sequence.
const SEQUENCE_FIELD: &str = "index";

/// Prefix of the hashes that hold bucket counters.
const DEFAULT_COUNTER_PREFIX: &str = "stats:count:";

/// A Redis implementation of [`CounterStore`].
///
/// Layout:
/// - a sequence is the field `index` of the hash named after the sequence
/// - plain values are Redis strings
/// - a bucket key `k` is the hash `stats:count:k`, its registry a sorted set
///   whose members all have score 0
#[derive(Debug, Clone)]
pub struct RedisCounterStore {
    conn: redis::aio::MultiplexedConnection,
    counter_prefix: String,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StoreError {
    let message = format!("{operation}: {err}");
    if err.is_timeout() || message.to_ascii_lowercase().contains("timed out") {
        StoreError::Timeout(message)
    } else if err.is_io_error() || err.is_connection_refusal() || err.is_connection_dropped() {
        StoreError::Unavailable(message)
    } else if matches!(
        err.kind(),
        redis::ErrorKind::UnexpectedReturnType | redis::ErrorKind::Parse
    ) || err.code() == Some("WRONGTYPE")
    {
        StoreError::InvalidData(message)
    } else {
        StoreError::Operation(message)
    }
}

impl RedisCounterStore {
    /// Creates a store on top of an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            counter_prefix: DEFAULT_COUNTER_PREFIX.to_string(),
        }
    }

    /// Creates a store with a custom counter hash prefix (e.g. "myapp:count:").
    pub fn with_counter_prefix(
        conn: redis::aio::MultiplexedConnection,
        counter_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            counter_prefix: counter_prefix.into(),
        }
    }

    /// Opens a multiplexed connection to `url` and wraps it.
    pub async fn connect(url: &str) -> Result<Self> {
        let client =
            redis::Client::open(url).map_err(|e| map_redis_error("invalid redis url", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to redis", e))?;
        debug!(url = %url, "connected to redis");
        Ok(Self::new(conn))
    }

    fn counter_key(&self, bucket_key: &str) -> String {
        format!("{}{}", self.counter_prefix, bucket_key)
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn allocate_next_id(&self, sequence: &str) -> Result<u64> {
        trace!(sequence = %sequence, "allocating next identifier");
        let mut conn = self.conn.clone();
        let next: i64 = conn
            .hincr(sequence, SEQUENCE_FIELD, 1)
            .await
            .map_err(|e| map_redis_error("failed to increment sequence", e))?;

        u64::try_from(next).map_err(|_| {
            warn!(sequence = %sequence, value = next, "sequence holds a negative value");
            StoreError::InvalidData(format!("sequence {sequence} is negative: {next}"))
        })
    }

    async fn set_if_absent(&self, sequence: &str, value: u64) -> Result<bool> {
        trace!(sequence = %sequence, value, "seeding sequence");
        let mut conn = self.conn.clone();
        conn.hset_nx(sequence, SEQUENCE_FIELD, value)
            .await
            .map_err(|e| map_redis_error("failed to seed sequence", e))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        trace!(key = %key, "writing value");
        let mut conn = self.conn.clone();
        conn.set::<_, _, ()>(key, value)
            .await
            .map_err(|e| map_redis_error("failed to write value", e))
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        trace!(key = %key, "reading value");
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| map_redis_error("failed to read value", e))
    }

    async fn increment_in_bucket(
        &self,
        registry: &str,
        bucket_key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64> {
        let counter_key = self.counter_key(bucket_key);
        trace!(registry = %registry, counter_key = %counter_key, field = %field, "incrementing bucket");

        let mut conn = self.conn.clone();
        let (count,): (i64,) = redis::pipe()
            .atomic()
            .zadd(registry, bucket_key, 0)
            .ignore()
            .hincr(&counter_key, field, amount)
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to increment bucket", e))?;
        Ok(count)
    }

    async fn read_bucket_field(&self, bucket_key: &str, field: &str) -> Result<Option<i64>> {
        let counter_key = self.counter_key(bucket_key);
        trace!(counter_key = %counter_key, field = %field, "reading bucket");

        let mut conn = self.conn.clone();
        conn.hget(&counter_key, field)
            .await
            .map_err(|e| map_redis_error("failed to read bucket", e))
    }

    async fn registered_buckets(&self, registry: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.clone();
        conn.zrange(registry, 0, -1)
            .await
            .map_err(|e| map_redis_error("failed to list registry", e))
    }
}
