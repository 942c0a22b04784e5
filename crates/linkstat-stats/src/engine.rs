use crate::error::Result;
use jiff::Timestamp;
use linkstat_core::keys::{bucket_field, bucket_key, BUCKET_REGISTRY_KEY};
use linkstat_core::{Clock, CounterStore, StoreError, SystemClock, Window};
use std::sync::Arc;
use tracing::{debug, trace};

/// Returns the start of the bucket `now` falls into, in seconds since the epoch.
///
/// The all-time window has a single bucket starting at `0`. For the others
/// this is `floor(now / width) * width`, so a bucket is never reused once its
/// period has passed.
pub fn bucket_start(window: Window, now: Timestamp) -> i64 {
    match window.duration_secs() {
        0 => 0,
        width => now.as_second().div_euclid(width) * width,
    }
}

/// Records and reads per-window hit counts on top of a [`CounterStore`].
#[derive(Debug)]
pub struct StatsEngine<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
}

impl<S: CounterStore> StatsEngine<S, SystemClock> {
    /// Creates an engine that buckets by wall clock time.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: CounterStore, C: Clock> StatsEngine<S, C> {
    pub fn with_clock(store: Arc<S>, clock: C) -> Self {
        Self { store, clock }
    }

    /// Counts one hit for `resource` in every window.
    ///
    /// Each window is a separate increment. If one fails the error is
    /// returned straight away: windows already incremented keep their new
    /// count and later windows are left untouched.
    pub async fn record_hit(&self, resource: u64) -> Result<()> {
        let now = self.clock.now();

        for window in Window::ALL {
            let key = bucket_key(window, resource);
            let field = bucket_field(bucket_start(window, now));
            let count = self
                .store
                .increment_in_bucket(BUCKET_REGISTRY_KEY, &key, &field, 1)
                .await?;
            trace!(resource, window = %window, bucket = %field, count, "counted hit");
        }

        debug!(resource, "recorded hit");
        Ok(())
    }

    /// Returns the hits `resource` received in the current bucket of `window`.
    ///
    /// A bucket that was never incremented counts as zero.
    pub async fn read_hits(&self, resource: u64, window: Window) -> Result<u64> {
        let key = bucket_key(window, resource);
        let field = bucket_field(bucket_start(window, self.clock.now()));

        let count = self
            .store
            .read_bucket_field(&key, &field)
            .await?
            .unwrap_or(0);
        trace!(resource, window = %window, bucket = %field, count, "read hits");

        u64::try_from(count).map_err(|_| {
            StoreError::InvalidData(format!("negative hit count {count} in {key}/{field}")).into()
        })
    }

    /// Like [`read_hits`](Self::read_hits) with the window given by name.
    pub async fn read_hits_by_name(&self, resource: u64, window: &str) -> Result<u64> {
        let window: Window = window.parse()?;
        self.read_hits(resource, window).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatsError;
    use async_trait::async_trait;
    use jiff::SignedDuration;
    use linkstat_core::{ManualClock, UnknownWindow};
    use linkstat_storage::InMemoryCounterStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lets a fixed number of bucket increments through, then reports the
    /// backend as unavailable for the rest.
    struct FailingStore {
        inner: InMemoryCounterStore,
        remaining: AtomicUsize,
    }

    impl FailingStore {
        fn failing_after(successes: usize) -> Self {
            Self {
                inner: InMemoryCounterStore::new(),
                remaining: AtomicUsize::new(successes),
            }
        }
    }

    #[async_trait]
    impl CounterStore for FailingStore {
        async fn allocate_next_id(&self, sequence: &str) -> linkstat_core::Result<u64> {
            self.inner.allocate_next_id(sequence).await
        }

        async fn set_if_absent(&self, sequence: &str, value: u64) -> linkstat_core::Result<bool> {
            self.inner.set_if_absent(sequence, value).await
        }

        async fn put(&self, key: &str, value: &str) -> linkstat_core::Result<()> {
            self.inner.put(key, value).await
        }

        async fn get(&self, key: &str) -> linkstat_core::Result<Option<String>> {
            self.inner.get(key).await
        }

        async fn increment_in_bucket(
            &self,
            registry: &str,
            bucket_key: &str,
            field: &str,
            amount: i64,
        ) -> linkstat_core::Result<i64> {
            let allowed = self
                .remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if !allowed {
                return Err(StoreError::Unavailable("connection refused".to_string()));
            }
            self.inner
                .increment_in_bucket(registry, bucket_key, field, amount)
                .await
        }

        async fn read_bucket_field(
            &self,
            bucket_key: &str,
            field: &str,
        ) -> linkstat_core::Result<Option<i64>> {
            self.inner.read_bucket_field(bucket_key, field).await
        }

        async fn registered_buckets(&self, registry: &str) -> linkstat_core::Result<Vec<String>> {
            self.inner.registered_buckets(registry).await
        }
    }

    // 2023-11-14T22:13:20Z, a Tuesday
    const T0: i64 = 1_700_000_000;

    fn at(second: i64) -> Timestamp {
        Timestamp::from_second(second).unwrap()
    }

    fn engine() -> (
        StatsEngine<InMemoryCounterStore, ManualClock>,
        Arc<InMemoryCounterStore>,
        ManualClock,
    ) {
        let store = Arc::new(InMemoryCounterStore::new());
        let clock = ManualClock::new(at(T0));
        let engine = StatsEngine::with_clock(Arc::clone(&store), clock.clone());
        (engine, store, clock)
    }

    #[test]
    fn bucket_start_aligns_to_window() {
        let now = at(T0);
        assert_eq!(bucket_start(Window::AllTime, now), 0);
        assert_eq!(bucket_start(Window::Minute, now), 1_699_999_980);
        assert_eq!(bucket_start(Window::Day, now), 1_699_920_000);
        assert_eq!(bucket_start(Window::Week, now), 1_699_488_000);
        assert_eq!(bucket_start(Window::Minute, at(T0 + 59)), 1_700_000_040);
    }

    #[test]
    fn bucket_start_before_epoch_rounds_down() {
        assert_eq!(bucket_start(Window::Minute, at(-1)), -60);
    }

    #[tokio::test]
    async fn record_hit_updates_every_window() {
        let (engine, store, _clock) = engine();

        engine.record_hit(42).await.unwrap();

        for window in Window::ALL {
            assert_eq!(engine.read_hits(42, window).await.unwrap(), 1, "{window}");
        }
        assert_eq!(
            store.registered_buckets(BUCKET_REGISTRY_KEY).await.unwrap(),
            vec!["0:42", "604800:42", "60:42", "86400:42"]
        );
    }

    #[tokio::test]
    async fn record_hit_uses_bucket_boundaries_as_fields() {
        let (engine, store, _clock) = engine();

        engine.record_hit(7).await.unwrap();

        assert_eq!(store.read_bucket_field("0:7", "0").await.unwrap(), Some(1));
        assert_eq!(
            store.read_bucket_field("60:7", "1699999980").await.unwrap(),
            Some(1)
        );
        assert_eq!(
            store.read_bucket_field("86400:7", "1699920000").await.unwrap(),
            Some(1)
        );
    }

    #[tokio::test]
    async fn unknown_resource_reads_zero() {
        let (engine, _store, _clock) = engine();

        for window in Window::ALL {
            assert_eq!(engine.read_hits(99, window).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn minute_window_rolls_over() {
        let (engine, _store, clock) = engine();

        engine.record_hit(1).await.unwrap();
        engine.record_hit(1).await.unwrap();
        assert_eq!(engine.read_hits(1, Window::Minute).await.unwrap(), 2);

        clock.advance(SignedDuration::from_secs(60));
        assert_eq!(engine.read_hits(1, Window::Minute).await.unwrap(), 0);
        assert_eq!(engine.read_hits(1, Window::Day).await.unwrap(), 2);
        assert_eq!(engine.read_hits(1, Window::AllTime).await.unwrap(), 2);

        engine.record_hit(1).await.unwrap();
        assert_eq!(engine.read_hits(1, Window::Minute).await.unwrap(), 1);
        assert_eq!(engine.read_hits(1, Window::AllTime).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn all_time_never_rolls_over() {
        let (engine, _store, clock) = engine();

        engine.record_hit(3).await.unwrap();
        clock.advance(SignedDuration::from_hours(24 * 30));
        engine.record_hit(3).await.unwrap();

        assert_eq!(engine.read_hits(3, Window::AllTime).await.unwrap(), 2);
        assert_eq!(engine.read_hits(3, Window::Week).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn resources_are_counted_separately() {
        let (engine, _store, _clock) = engine();

        engine.record_hit(1).await.unwrap();
        engine.record_hit(2).await.unwrap();
        engine.record_hit(2).await.unwrap();

        assert_eq!(engine.read_hits(1, Window::AllTime).await.unwrap(), 1);
        assert_eq!(engine.read_hits(2, Window::AllTime).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn read_by_name() {
        let (engine, _store, _clock) = engine();
        engine.record_hit(5).await.unwrap();

        assert_eq!(engine.read_hits_by_name(5, "24h").await.unwrap(), 1);
        assert_eq!(
            engine.read_hits_by_name(5, "fortnight").await.unwrap_err(),
            StatsError::UnknownWindow(UnknownWindow("fortnight".to_string()))
        );
    }

    #[tokio::test]
    async fn partial_failure_is_not_rolled_back() {
        let store = Arc::new(FailingStore::failing_after(2));
        let engine = StatsEngine::with_clock(Arc::clone(&store), ManualClock::new(at(T0)));

        let err = engine.record_hit(8).await.unwrap_err();
        assert!(matches!(err, StatsError::Store(StoreError::Unavailable(_))));

        assert_eq!(engine.read_hits(8, Window::AllTime).await.unwrap(), 1);
        assert_eq!(engine.read_hits(8, Window::Minute).await.unwrap(), 1);
        assert_eq!(engine.read_hits(8, Window::Day).await.unwrap(), 0);
        assert_eq!(engine.read_hits(8, Window::Week).await.unwrap(), 0);
    }
}
