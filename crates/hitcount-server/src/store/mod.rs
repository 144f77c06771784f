//! Counter storage.
//!
//! `CounterStore` is the seam between the counting service and persistence.
//! Implementations must make `increment` a single atomic upsert: two
//! concurrent hits on the same referrer both land.

pub mod memory;
pub mod mongo;

use std::sync::Arc;

use async_trait::async_trait;

use hitcount_core::error::Result;
use hitcount_core::CounterRecord;

use crate::config::{StorageBackend, StorageSection};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment the counter for `referrer`, creating it at 1 if absent.
    /// Returns the record as written.
    async fn increment(&self, referrer: &str) -> Result<CounterRecord>;

    async fn get(&self, referrer: &str) -> Result<Option<CounterRecord>>;

    /// All records that carry a referrer.
    async fn list(&self) -> Result<Vec<CounterRecord>>;

    /// Round-trip to the backend.
    async fn ping(&self) -> Result<()>;
}

/// Build the store selected by config.
pub async fn connect(cfg: &StorageSection) -> Result<Arc<dyn CounterStore>> {
    match cfg.backend {
        StorageBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StorageBackend::Mongo => Ok(Arc::new(MongoStore::connect(cfg).await?)),
    }
}
