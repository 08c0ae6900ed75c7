use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use barstore_core::{BarRequest, BarSource, BarTable, BarstoreError, Frequency, Instrument};
use barstore_types::CacheConfig;
use chrono::NaiveDate;
use moka::future::Cache;

use crate::Middleware;

/// Identity of one bar request for caching discrimination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HistoryKey {
    inst: Instrument,
    req: BarRequest,
}

#[async_trait]
trait CacheStore<K, V>: Send + Sync {
    async fn get(&self, key: &K) -> Option<V>;
    async fn put(&self, key: K, value: V);
}

/// Size-bounded store with an optional per-entry time-to-live.
struct MokaStore<K, V> {
    inner: Cache<K, V>,
}

impl<K, V> MokaStore<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn new(capacity: u64, ttl: Option<Duration>) -> Self {
        let builder = Cache::builder().max_capacity(capacity);
        let inner = match ttl {
            Some(ttl) => builder.time_to_live(ttl).build(),
            None => builder.build(),
        };
        Self { inner }
    }
}

#[async_trait]
impl<K, V> CacheStore<K, V> for MokaStore<K, V>
where
    K: std::hash::Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).await
    }

    async fn put(&self, key: K, value: V) {
        self.inner.insert(key, value).await;
    }
}

/// Middleware descriptor that wraps a source in [`CachingBarSource`].
pub struct CacheMiddleware {
    cfg: CacheConfig,
}

impl CacheMiddleware {
    /// Descriptor for `cfg`.
    #[must_use]
    pub const fn new(cfg: CacheConfig) -> Self {
        Self { cfg }
    }
}

impl Middleware for CacheMiddleware {
    fn apply(self: Box<Self>, inner: Arc<dyn BarSource>) -> Arc<dyn BarSource> {
        let Self { cfg } = *self;
        Arc::new(CachingBarSource::new(inner, &cfg))
    }

    fn name(&self) -> &'static str {
        "CachingBarSource"
    }

    fn config_json(&self) -> serde_json::Value {
        serde_json::json!({
            "max_entries": self.cfg.max_entries,
            "ttl_ms": self
                .cfg
                .ttl
                .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        })
    }
}

/// Read-through cache in front of a [`BarSource`].
///
/// Successful `raw_history_bars` results are kept per instrument and request.
/// Errors pass through uncached. `available_data_range` is not cached here.
pub struct CachingBarSource {
    inner: Arc<dyn BarSource>,
    history: Option<Arc<dyn CacheStore<HistoryKey, Arc<BarTable>>>>,
}

impl CachingBarSource {
    /// Wrap `inner`. A zero `max_entries` or a zero TTL disables caching.
    #[must_use]
    pub fn new(inner: Arc<dyn BarSource>, cfg: &CacheConfig) -> Self {
        let disabled = cfg.max_entries == 0 || cfg.ttl.is_some_and(|t| t.is_zero());
        let history: Option<Arc<dyn CacheStore<HistoryKey, Arc<BarTable>>>> = if disabled {
            None
        } else {
            Some(Arc::new(MokaStore::new(cfg.max_entries, cfg.ttl)))
        };
        Self { inner, history }
    }
}

#[async_trait]
impl BarSource for CachingBarSource {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        let Some(store) = &self.history else {
            return self.inner.raw_history_bars(instrument, req).await;
        };
        let key = HistoryKey {
            inst: instrument.clone(),
            req,
        };
        if let Some(v) = store.get(&key).await {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target = "barstore::cache",
                order_book_id = instrument.order_book_id(),
                frequency = %req.frequency,
                "bar cache hit"
            );
            return Ok((*v).clone());
        }
        let value = self.inner.raw_history_bars(instrument, req).await?;
        store.put(key, Arc::new(value.clone())).await;
        Ok(value)
    }

    async fn available_data_range(
        &self,
        frequency: Frequency,
    ) -> Result<(NaiveDate, NaiveDate), BarstoreError> {
        self.inner.available_data_range(frequency).await
    }
}
