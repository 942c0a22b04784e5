use async_trait::async_trait;
use dashmap::DashMap;
use linkstat_core::{CounterStore, Result, StoreError};
use std::collections::{BTreeSet, HashMap};

/// In-memory implementation of [`CounterStore`] using DashMap.
///
/// Each operation holds the shard lock of the entry it touches, which makes
/// sequence allocation and bucket increments atomic per key. Nothing is
/// persisted; this backend exists for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    sequences: DashMap<String, u64>,
    values: DashMap<String, String>,
    buckets: DashMap<String, HashMap<String, i64>>,
    registries: DashMap<String, BTreeSet<String>>,
}

impl InMemoryCounterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn allocate_next_id(&self, sequence: &str) -> Result<u64> {
        let mut current = self.sequences.entry(sequence.to_owned()).or_insert(0);
        let next = current
            .checked_add(1)
            .ok_or_else(|| StoreError::InvalidData(format!("sequence {sequence} overflowed")))?;
        *current = next;
        Ok(next)
    }

    async fn set_if_absent(&self, sequence: &str, value: u64) -> Result<bool> {
        match self.sequences.entry(sequence.to_owned()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Ok(false),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(true)
            }
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|value| value.clone()))
    }

    async fn increment_in_bucket(
        &self,
        registry: &str,
        bucket_key: &str,
        field: &str,
        amount: i64,
    ) -> Result<i64> {
        self.registries
            .entry(registry.to_owned())
            .or_default()
            .insert(bucket_key.to_owned());

        let mut bucket = self.buckets.entry(bucket_key.to_owned()).or_default();
        let count = bucket.entry(field.to_owned()).or_insert(0);
        *count = count.checked_add(amount).ok_or_else(|| {
            StoreError::InvalidData(format!("counter {bucket_key}/{field} overflowed"))
        })?;
        Ok(*count)
    }

    async fn read_bucket_field(&self, bucket_key: &str, field: &str) -> Result<Option<i64>> {
        Ok(self
            .buckets
            .get(bucket_key)
            .and_then(|bucket| bucket.get(field).copied()))
    }

    async fn registered_buckets(&self, registry: &str) -> Result<Vec<String>> {
        Ok(self
            .registries
            .get(registry)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn allocation_starts_at_one() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.allocate_next_id("seq").await.unwrap(), 1);
        assert_eq!(store.allocate_next_id("seq").await.unwrap(), 2);
        assert_eq!(store.allocate_next_id("other").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn set_if_absent_seeds_once() {
        let store = InMemoryCounterStore::new();

        assert!(store.set_if_absent("seq", 1_001_001).await.unwrap());
        assert!(!store.set_if_absent("seq", 5).await.unwrap());
        assert_eq!(store.allocate_next_id("seq").await.unwrap(), 1_001_002);
    }

    #[tokio::test]
    async fn set_if_absent_after_allocation_is_a_no_op() {
        let store = InMemoryCounterStore::new();

        store.allocate_next_id("seq").await.unwrap();
        assert!(!store.set_if_absent("seq", 1_001_001).await.unwrap());
        assert_eq!(store.allocate_next_id("seq").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.get("k").await.unwrap(), None);
        store.put("k", "v1").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));
        store.put("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn increments_fields_independently() {
        let store = InMemoryCounterStore::new();

        assert_eq!(store.increment_in_bucket("reg", "0:1", "0", 1).await.unwrap(), 1);
        assert_eq!(store.increment_in_bucket("reg", "0:1", "0", 2).await.unwrap(), 3);
        assert_eq!(store.increment_in_bucket("reg", "0:1", "60", 1).await.unwrap(), 1);

        assert_eq!(store.read_bucket_field("0:1", "0").await.unwrap(), Some(3));
        assert_eq!(store.read_bucket_field("0:1", "60").await.unwrap(), Some(1));
        assert_eq!(store.read_bucket_field("0:1", "120").await.unwrap(), None);
        assert_eq!(store.read_bucket_field("0:2", "0").await.unwrap(), None);
    }

    #[tokio::test]
    async fn increment_records_bucket_in_registry() {
        let store = InMemoryCounterStore::new();

        store.increment_in_bucket("reg", "60:1", "60", 1).await.unwrap();
        store.increment_in_bucket("reg", "0:1", "0", 1).await.unwrap();
        store.increment_in_bucket("reg", "0:1", "0", 1).await.unwrap();

        assert_eq!(
            store.registered_buckets("reg").await.unwrap(),
            vec!["0:1".to_string(), "60:1".to_string()]
        );
        assert!(store.registered_buckets("empty").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_allocation_never_repeats() {
        let store = Arc::new(InMemoryCounterStore::new());
        let mut handles = vec![];

        for _ in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::with_capacity(100);
                for _ in 0..100 {
                    ids.push(store.allocate_next_id("seq").await.unwrap());
                }
                ids
            }));
        }

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.await.unwrap() {
                assert!(seen.insert(id), "identifier {id} allocated twice");
            }
        }
        assert_eq!(seen.len(), 1_600);
    }

    #[tokio::test]
    async fn concurrent_increments_are_not_lost() {
        let store = Arc::new(InMemoryCounterStore::new());
        let mut handles = vec![];

        for _ in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    store.increment_in_bucket("reg", "0:9", "0", 1).await.unwrap();
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.read_bucket_field("0:9", "0").await.unwrap(), Some(400));
    }
}
