use std::sync::Arc;
use std::time::Duration;

use barstore_core::{
    BarstoreConfig, BarstoreError, Capability, CollectionPair, DocumentStore, Instrument,
    MinuteBarSource, Namespace, WindowReader,
};
use chrono::NaiveDate;

use crate::router::range::RangeResolver;

/// Latest valid packed `HHMMSS`.
const LAST_SECOND: i64 = 235_959;

/// Bar assembly engine over a shard-document store.
///
/// One instance is meant to be built at startup and shared (`Arc<Barstore>`);
/// the only state it carries across calls is the available-range cache.
pub struct Barstore {
    pub(crate) store: Arc<dyn DocumentStore>,
    pub(crate) window_reader: Arc<dyn WindowReader>,
    pub(crate) minute_source: Arc<dyn MinuteBarSource>,
    pub(crate) cfg: BarstoreConfig,
    pub(crate) ranges: RangeResolver,
}

/// Builder for constructing a `Barstore` engine with custom configuration.
pub struct BarstoreBuilder {
    store: Option<Arc<dyn DocumentStore>>,
    window_reader: Option<Arc<dyn WindowReader>>,
    minute_source: Option<Arc<dyn MinuteBarSource>>,
    cfg: BarstoreConfig,
}

impl Default for BarstoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BarstoreBuilder {
    /// Create a new builder with the default configuration.
    ///
    /// Defaults mirror the production layout: database `quantaxis`,
    /// `stock_day`/`stock_min` and `index_day`/`index_min` collections,
    /// a 15:00:00 session end, ten memoized ranges, and no query timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: None,
            window_reader: None,
            minute_source: None,
            cfg: BarstoreConfig::default(),
        }
    }

    /// Document store holding the minute shards and the reference instrument.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Reader serving day bars by date window.
    #[must_use]
    pub fn window_reader(mut self, reader: Arc<dyn WindowReader>) -> Self {
        self.window_reader = Some(reader);
        self
    }

    /// External path serving minute bars.
    #[must_use]
    pub fn minute_source(mut self, source: Arc<dyn MinuteBarSource>) -> Self {
        self.minute_source = Some(source);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: BarstoreConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Database holding every bar collection.
    #[must_use]
    pub fn database(mut self, name: impl Into<String>) -> Self {
        self.cfg.database = name.into();
        self
    }

    /// Set the collection pair used for an instrument family.
    #[must_use]
    pub fn collections(mut self, family: impl Into<String>, pair: CollectionPair) -> Self {
        self.cfg.collections.insert(family.into(), pair);
        self
    }

    /// Instrument whose minute shards bound the available minute history.
    #[must_use]
    pub fn reference_instrument(
        mut self,
        code: impl Into<String>,
        family: impl Into<String>,
    ) -> Self {
        self.cfg.reference_code = code.into();
        self.cfg.reference_family = family.into();
        self
    }

    /// First date reported as available for day and hour frequencies.
    #[must_use]
    pub const fn daily_epoch(mut self, date: NaiveDate) -> Self {
        self.cfg.daily_epoch = date;
        self
    }

    /// Packed `HHMMSS` used when a session block has no end time.
    #[must_use]
    pub const fn session_end_time(mut self, hhmmss: i64) -> Self {
        self.cfg.session_end_time = hhmmss;
        self
    }

    /// Number of frequencies whose available range is memoized.
    #[must_use]
    pub const fn range_cache_capacity(mut self, capacity: u64) -> Self {
        self.cfg.range_cache_capacity = capacity;
        self
    }

    /// Bound every store round trip.
    ///
    /// When exceeded, the call fails with `RequestTimeout` for its capability.
    #[must_use]
    pub const fn query_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.query_timeout = Some(timeout);
        self
    }

    /// Build the engine.
    ///
    /// # Errors
    /// Returns `InvalidArg` if a collaborator is missing, the range cache has
    /// no capacity, the session end is not a valid time of day, or the
    /// reference family has no collection pair.
    pub fn build(self) -> Result<Barstore, BarstoreError> {
        let missing = |what: &str| {
            BarstoreError::InvalidArg(format!("no {what} registered; add one via {what}(...)"))
        };
        let store = self.store.ok_or_else(|| missing("store"))?;
        let window_reader = self.window_reader.ok_or_else(|| missing("window_reader"))?;
        let minute_source = self.minute_source.ok_or_else(|| missing("minute_source"))?;

        if self.cfg.range_cache_capacity == 0 {
            return Err(BarstoreError::InvalidArg(
                "range cache capacity must be positive".into(),
            ));
        }
        let end = self.cfg.session_end_time;
        if !(0..=LAST_SECOND).contains(&end) || end / 100 % 100 > 59 || end % 100 > 59 {
            return Err(BarstoreError::InvalidArg(format!(
                "session end {end} is not a valid HHMMSS time"
            )));
        }
        if self.cfg.collections_for(&self.cfg.reference_family).is_none() {
            return Err(BarstoreError::InvalidArg(format!(
                "reference family {:?} has no collections",
                self.cfg.reference_family
            )));
        }

        Ok(Barstore {
            store,
            window_reader,
            minute_source,
            ranges: RangeResolver::new(self.cfg.range_cache_capacity),
            cfg: self.cfg,
        })
    }
}

impl Barstore {
    /// Start building a new `Barstore` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    ///
    /// let store = Arc::new(barstore_mock::fixtures::sample_store());
    /// let engine = barstore::Barstore::builder()
    ///     .store(store.clone())
    ///     .window_reader(Arc::new(barstore_mock::MemoryWindowReader::new(store)))
    ///     .minute_source(Arc::new(barstore_mock::MockMinuteSource::new()))
    ///     .query_timeout(std::time::Duration::from_secs(5))
    ///     .build()?;
    /// ```
    #[must_use]
    pub fn builder() -> BarstoreBuilder {
        BarstoreBuilder::new()
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &BarstoreConfig {
        &self.cfg
    }

    /// Wrap a store future with the configured timeout and standardized
    /// timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barstore::core::with_query_timeout",
            skip(self, capability, fut),
            fields(capability = %capability),
        )
    )]
    pub(crate) async fn with_query_timeout<T, Fut>(
        &self,
        capability: Capability,
        fut: Fut,
    ) -> Result<T, BarstoreError>
    where
        Fut: core::future::Future<Output = Result<T, BarstoreError>>,
    {
        match self.cfg.query_timeout {
            Some(limit) => (tokio::time::timeout(limit, fut).await)
                .unwrap_or_else(|_| Err(BarstoreError::request_timeout(capability))),
            None => fut.await,
        }
    }

    /// Collection pair for the instrument's family.
    pub(crate) fn collections_for(
        &self,
        instrument: &Instrument,
    ) -> Result<&CollectionPair, BarstoreError> {
        let kind = instrument.kind();
        kind.family()
            .and_then(|family| self.cfg.collections_for(family))
            .ok_or_else(|| {
                BarstoreError::unsupported(format!("bars/{}", format!("{kind:?}").to_lowercase()))
            })
    }

    pub(crate) fn namespace(&self, collection: &str) -> Namespace {
        Namespace::new(self.cfg.database.as_str(), collection)
    }
}
