use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use hitcount_core::error::Result;
use hitcount_core::CounterRecord;

use super::CounterStore;

/// Process-local store. Counts are lost on restart.
///
/// `increment` runs under the DashMap shard lock for the key, so concurrent
/// hits on one referrer serialize.
pub struct MemoryStore {
    records: DashMap<String, CounterRecord>,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CounterStore for MemoryStore {
    async fn increment(&self, referrer: &str) -> Result<CounterRecord> {
        let mut entry = self
            .records
            .entry(referrer.to_string())
            .or_insert_with(|| CounterRecord {
                id: self.seq.fetch_add(1, Ordering::Relaxed).to_string(),
                referrer: referrer.to_string(),
                count: 0,
            });
        entry.count += 1;
        Ok(entry.value().clone())
    }

    async fn get(&self, referrer: &str) -> Result<Option<CounterRecord>> {
        Ok(self.records.get(referrer).map(|r| r.value().clone()))
    }

    async fn list(&self) -> Result<Vec<CounterRecord>> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn first_hit_creates_record_at_one() {
        let store = MemoryStore::new();
        let rec = store.increment("https://example.com").await.unwrap();
        assert_eq!(rec.count, 1);
        assert_eq!(rec.referrer, "https://example.com");
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn id_is_stable_across_increments() {
        let store = MemoryStore::new();
        let first = store.increment("r").await.unwrap();
        let second = store.increment("r").await.unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.count, 2);
    }

    #[tokio::test]
    async fn keys_are_exact_match() {
        let store = MemoryStore::new();
        store.increment("https://a.test").await.unwrap();
        store.increment("https://a.test/").await.unwrap();
        store.increment("HTTPS://A.TEST").await.unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.get("https://a.test").await.unwrap().unwrap().count, 1);
        assert!(store.get("a.test").await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_hits_are_not_lost() {
        let store = Arc::new(MemoryStore::new());
        let mut tasks = Vec::new();
        for _ in 0..16 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                for _ in 0..50 {
                    store.increment("https://busy.test").await.unwrap();
                }
            }));
        }
        for t in tasks {
            t.await.unwrap();
        }

        let rec = store.get("https://busy.test").await.unwrap().unwrap();
        assert_eq!(rec.count, 16 * 50);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }
}
