use barstore_core::time::unpack_datetime;
use barstore_core::{
    BarstoreError, Capability, DATETIME, Document, FieldValue, Frequency, SortDirection, SortSpec,
};
use chrono::{Days, Local, NaiveDate, NaiveDateTime};
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde_json::json;

use super::plan::FetchPlan;
use crate::Barstore;

/// Earliest and latest dates with data for one frequency.
pub type DataRange = (NaiveDate, NaiveDate);

/// Bounded LRU memo of resolved ranges, keyed by frequency.
///
/// Concurrent first lookups of one key share a single resolution; failed
/// resolutions are not stored.
pub(crate) struct RangeResolver {
    cache: Cache<Frequency, DataRange>,
}

impl RangeResolver {
    pub(crate) fn new(capacity: u64) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        }
    }
}

/// Smallest (ascending) or largest (descending) instant stored under `key`.
///
/// Scalar values and per-bar arrays are both accepted; strings are parsed in
/// the store's date-time formats, numbers are taken as packed instants.
fn bound_instant(doc: &Document, key: &str, direction: SortDirection) -> Option<NaiveDateTime> {
    let value = doc.get(key)?;
    let packed = match value.as_array() {
        Some(items) => {
            let times = items.iter().filter_map(|v| FieldValue::from(v).as_packed_time());
            match direction {
                SortDirection::Ascending => times.min(),
                SortDirection::Descending => times.max(),
            }
        }
        None => FieldValue::from(value).as_packed_time(),
    }?;
    unpack_datetime(packed)
}

impl Barstore {
    /// Earliest and latest dates for which `frequency` has data.
    ///
    /// - Day and hour frequencies: the configured epoch (2012-06-01 by
    ///   default) through yesterday, without touching the store.
    /// - Minute frequencies: the first and last stored instants of the
    ///   reference instrument's one-minute shards, as dates.
    ///
    /// Results are memoized per frequency for the life of the engine, so a
    /// day range computed before midnight keeps reporting that day's
    /// yesterday.
    ///
    /// # Errors
    /// Returns `RangeUnavailable` when the reference instrument has no
    /// minute record, and propagates store errors and timeouts. Errors are
    /// not memoized.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barstore::router::available_data_range",
            skip(self, frequency),
            fields(frequency = %frequency),
        )
    )]
    pub async fn available_data_range(
        &self,
        frequency: Frequency,
    ) -> Result<DataRange, BarstoreError> {
        self.ranges
            .cache
            .try_get_with(frequency, self.resolve_range(frequency))
            .await
            .map_err(|e| (*e).clone())
    }

    async fn resolve_range(&self, frequency: Frequency) -> Result<DataRange, BarstoreError> {
        match FetchPlan::for_frequency(frequency) {
            FetchPlan::Day | FetchPlan::OtherIntraday => Ok(self.fixed_range()),
            FetchPlan::Minute => {
                self.with_query_timeout(Capability::DataRange, self.probe_minute_range(frequency))
                    .await
            }
        }
    }

    fn fixed_range(&self) -> DataRange {
        let today = Local::now().date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        (self.cfg.daily_epoch, yesterday)
    }

    async fn probe_minute_range(&self, frequency: Frequency) -> Result<DataRange, BarstoreError> {
        let unavailable = || BarstoreError::range_unavailable(frequency.to_string());
        let pair = self
            .cfg
            .collections_for(&self.cfg.reference_family)
            .ok_or_else(unavailable)?;
        let ns = self.namespace(&pair.minute);
        let filter = json!({
            "code": self.cfg.reference_code,
            "type": self.cfg.minute_type_tag,
        });

        let first = self
            .store
            .find_sorted(&ns, &filter, &SortSpec::ascending(DATETIME), 1)
            .await?;
        let last = self
            .store
            .find_sorted(&ns, &filter, &SortSpec::descending(DATETIME), 1)
            .await?;

        let start = first
            .first()
            .and_then(|d| bound_instant(d, DATETIME, SortDirection::Ascending))
            .ok_or_else(unavailable)?;
        let end = last
            .first()
            .and_then(|d| bound_instant(d, DATETIME, SortDirection::Descending))
            .ok_or_else(unavailable)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            target = "barstore::range",
            %frequency,
            %start,
            %end,
            "resolved minute range from reference instrument"
        );
        Ok((start.date(), end.date()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use barstore_mock::{MemoryStore, MemoryWindowReader, MockMinuteSource, fixtures};

    fn doc(v: serde_json::Value) -> Document {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn bound_instant_reads_scalars_and_arrays() {
        let scalar = doc(json!({"datetime": "2019-01-02 09:31:00"}));
        assert_eq!(
            bound_instant(&scalar, "datetime", SortDirection::Ascending).map(|d| d.date()),
            NaiveDate::from_ymd_opt(2019, 1, 2)
        );

        let shard = doc(json!({
            "datetime": ["2019-01-02 15:00:00", "2019-01-02 09:31:00", null],
        }));
        let lo = bound_instant(&shard, "datetime", SortDirection::Ascending).unwrap();
        let hi = bound_instant(&shard, "datetime", SortDirection::Descending).unwrap();
        assert_eq!(lo.format("%H%M").to_string(), "0931");
        assert_eq!(hi.format("%H%M").to_string(), "1500");

        let garbled = doc(json!({"datetime": "n/a"}));
        assert!(bound_instant(&garbled, "datetime", SortDirection::Ascending).is_none());
        assert!(bound_instant(&doc(json!({})), "datetime", SortDirection::Ascending).is_none());
    }

    fn engine(store: &Arc<MemoryStore>, capacity: u64) -> Barstore {
        Barstore::builder()
            .store(store.clone())
            .window_reader(Arc::new(MemoryWindowReader::new(store.clone())))
            .minute_source(Arc::new(MockMinuteSource::new()))
            .range_cache_capacity(capacity)
            .build()
            .unwrap()
    }

    async fn lookup(engine: &Barstore, tag: &str) {
        let frequency: Frequency = tag.parse().unwrap();
        engine.available_data_range(frequency).await.unwrap();
        engine.ranges.cache.run_pending_tasks().await;
    }

    #[tokio::test]
    async fn least_recently_used_range_is_evicted_at_capacity() {
        let store = Arc::new(fixtures::sample_store());
        let engine = engine(&store, 1);

        lookup(&engine, "1m").await;
        assert_eq!(store.find_sorted_calls(), 2);
        lookup(&engine, "1m").await;
        assert_eq!(store.find_sorted_calls(), 2);

        // A second frequency pushes the first one out.
        lookup(&engine, "5m").await;
        assert_eq!(store.find_sorted_calls(), 4);
        assert_eq!(engine.ranges.cache.entry_count(), 1);

        lookup(&engine, "1m").await;
        assert_eq!(store.find_sorted_calls(), 6);
        lookup(&engine, "5m").await;
        assert_eq!(store.find_sorted_calls(), 8);
    }

    #[tokio::test]
    async fn ranges_within_capacity_stay_cached() {
        let store = Arc::new(fixtures::sample_store());
        let engine = engine(&store, 2);

        for tag in ["1m", "5m", "1m", "5m"] {
            lookup(&engine, tag).await;
        }
        assert_eq!(store.find_sorted_calls(), 4);
    }
}
