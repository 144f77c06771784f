//! Shared application state for the hitcount server.
//!
//! The store handle is built once at startup and injected here; handlers
//! reach it only through `AppState`, so tests can swap in any
//! `CounterStore`.

use std::sync::Arc;

use hitcount_core::error::Result;

use crate::config::ServiceConfig;
use crate::services::CounterService;
use crate::store::{self, CounterStore};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    counter: CounterService,
}

struct AppStateInner {
    cfg: ServiceConfig,
}

impl AppState {
    pub fn new(cfg: ServiceConfig, store: Arc<dyn CounterStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            counter: CounterService::new(store),
        }
    }

    /// Connect the store named in `cfg.storage` and build state around it.
    pub async fn connect(cfg: ServiceConfig) -> Result<Self> {
        let store = store::connect(&cfg.storage).await?;
        Ok(Self::new(cfg, store))
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn counter(&self) -> &CounterService {
        &self.counter
    }
}
