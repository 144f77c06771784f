use std::sync::Arc;

use hitcount_core::error::Result;
use hitcount_core::model::non_empty;
use hitcount_core::{CounterRecord, HitResponse};

use crate::store::CounterStore;

/// Counts hits per referrer on top of a `CounterStore`.
#[derive(Clone)]
pub struct CounterService {
    store: Arc<dyn CounterStore>,
}

impl CounterService {
    pub fn new(store: Arc<dyn CounterStore>) -> Self {
        Self { store }
    }

    /// Record one hit for `referrer` and return the post-write count.
    ///
    /// A missing or empty referrer is answered with `{referrer: null, count: 0}`
    /// and never reaches the store.
    pub async fn record_hit(&self, referrer: Option<&str>) -> Result<HitResponse> {
        let Some(referrer) = non_empty(referrer) else {
            return Ok(HitResponse::anonymous());
        };

        let record = self.store.increment(referrer).await?;
        tracing::debug!(referrer = %record.referrer, count = record.count, "hit recorded");
        Ok(HitResponse::counted(record))
    }

    pub async fn lookup(&self, referrer: &str) -> Result<Option<CounterRecord>> {
        self.store.get(referrer).await
    }

    pub async fn snapshot(&self) -> Result<Vec<CounterRecord>> {
        self.store.list().await
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use hitcount_core::HitCountError;

    use super::*;
    use crate::store::MemoryStore;

    struct DownStore;

    #[async_trait]
    impl CounterStore for DownStore {
        async fn increment(&self, _referrer: &str) -> Result<CounterRecord> {
            Err(HitCountError::Storage("connection refused".into()))
        }
        async fn get(&self, _referrer: &str) -> Result<Option<CounterRecord>> {
            Err(HitCountError::Storage("connection refused".into()))
        }
        async fn list(&self) -> Result<Vec<CounterRecord>> {
            Err(HitCountError::Storage("connection refused".into()))
        }
        async fn ping(&self) -> Result<()> {
            Err(HitCountError::Storage("connection refused".into()))
        }
    }

    fn memory_service() -> (CounterService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (CounterService::new(store.clone()), store)
    }

    #[tokio::test]
    async fn sequential_hits_count_up_from_one() {
        let (svc, _) = memory_service();
        for n in 1..=5 {
            let res = svc.record_hit(Some("https://example.com")).await.unwrap();
            assert_eq!(res.count, n);
            assert_eq!(res.referrer.as_deref(), Some("https://example.com"));
        }
    }

    #[tokio::test]
    async fn missing_or_empty_referrer_does_not_touch_store() {
        let (svc, store) = memory_service();
        assert_eq!(svc.record_hit(None).await.unwrap(), HitResponse::anonymous());
        assert_eq!(svc.record_hit(Some("")).await.unwrap(), HitResponse::anonymous());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn anonymous_hits_succeed_even_when_store_is_down() {
        let svc = CounterService::new(Arc::new(DownStore));
        assert_eq!(svc.record_hit(None).await.unwrap().count, 0);
    }

    #[tokio::test]
    async fn referrers_are_independent() {
        let (svc, _) = memory_service();
        svc.record_hit(Some("https://a.test")).await.unwrap();
        svc.record_hit(Some("https://a.test")).await.unwrap();
        let b = svc.record_hit(Some("https://b.test")).await.unwrap();
        assert_eq!(b.count, 1);
        assert_eq!(svc.lookup("https://a.test").await.unwrap().unwrap().count, 2);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let svc = CounterService::new(Arc::new(DownStore));
        let err = svc.record_hit(Some("https://a.test")).await.unwrap_err();
        assert_eq!(err.client_code().as_str(), "STORAGE");
    }
}
