//! Configuration types shared by the engine and its middleware.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Collection names holding one instrument family's day and minute shards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPair {
    /// Collection with one document per day-level shard.
    pub day: String,
    /// Collection with one document per minute-level shard.
    pub minute: String,
}

impl CollectionPair {
    /// Convenience constructor.
    pub fn new(day: impl Into<String>, minute: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            minute: minute.into(),
        }
    }
}

/// Global configuration for the `Barstore` engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarstoreConfig {
    /// Database holding every bar collection.
    pub database: String,
    /// Collection pair per instrument family (`"stock"`, `"index"`).
    pub collections: BTreeMap<String, CollectionPair>,
    /// Value of the `type` field selecting one-minute shards.
    pub minute_type_tag: String,
    /// Raw code of the benchmark instrument used to probe minute coverage.
    pub reference_code: String,
    /// Family of the benchmark instrument (selects its minute collection).
    pub reference_family: String,
    /// First date considered available for day and hour frequencies.
    pub daily_epoch: NaiveDate,
    /// Packed `HHMMSS` end of the trading session, used when a session block
    /// carries no explicit end time.
    pub session_end_time: i64,
    /// Maximum number of frequencies whose available range is memoized.
    pub range_cache_capacity: u64,
    /// Optional bound on a single store query. `None` waits indefinitely.
    pub query_timeout: Option<Duration>,
}

impl Default for BarstoreConfig {
    fn default() -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(
            "stock".to_string(),
            CollectionPair::new("stock_day", "stock_min"),
        );
        collections.insert(
            "index".to_string(),
            CollectionPair::new("index_day", "index_min"),
        );
        Self {
            database: "quantaxis".to_string(),
            collections,
            minute_type_tag: "1min".to_string(),
            reference_code: "000001".to_string(),
            reference_family: "index".to_string(),
            daily_epoch: NaiveDate::from_ymd_opt(2012, 6, 1).unwrap_or(NaiveDate::MIN),
            session_end_time: 150_000,
            range_cache_capacity: 10,
            query_timeout: None,
        }
    }
}

impl BarstoreConfig {
    /// Collection pair for an instrument family, if configured.
    #[must_use]
    pub fn collections_for(&self, family: &str) -> Option<&CollectionPair> {
        self.collections.get(family)
    }
}

/// Configuration for the read-through bar cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached bar tables.
    pub max_entries: u64,
    /// Time-to-live for a cached entry. `None` keeps entries until evicted.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 256,
            ttl: Some(Duration::from_secs(300)),
        }
    }
}
