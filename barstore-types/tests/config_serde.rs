use std::time::Duration;

use barstore_types::{BarstoreConfig, BarstoreError, CacheConfig};
use chrono::NaiveDate;

#[test]
fn default_config_matches_store_layout() {
    let cfg = BarstoreConfig::default();
    assert_eq!(cfg.database, "quantaxis");
    assert_eq!(cfg.collections_for("stock").unwrap().day, "stock_day");
    assert_eq!(cfg.collections_for("index").unwrap().minute, "index_min");
    assert!(cfg.collections_for("fund").is_none());
    assert_eq!(cfg.daily_epoch, NaiveDate::from_ymd_opt(2012, 6, 1).unwrap());
    assert_eq!(cfg.session_end_time, 150_000);
    assert_eq!(cfg.range_cache_capacity, 10);
    assert!(cfg.query_timeout.is_none());
}

#[test]
fn barstore_config_roundtrip() {
    let mut cfg = BarstoreConfig::default();
    cfg.query_timeout = Some(Duration::from_millis(2500));
    cfg.reference_code = "000300".into();

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: BarstoreConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de.reference_code, "000300");
    assert_eq!(de.query_timeout, Some(Duration::from_millis(2500)));
    assert_eq!(de.collections, cfg.collections);
    assert_eq!(de.daily_epoch, cfg.daily_epoch);
}

#[test]
fn cache_config_roundtrip() {
    let cfg = CacheConfig {
        max_entries: 8,
        ttl: None,
    };
    let json = serde_json::to_string(&cfg).expect("serialize cache config");
    let de: CacheConfig = serde_json::from_str(&json).expect("deserialize cache config");
    assert_eq!(de.max_entries, 8);
    assert!(de.ttl.is_none());
}

#[test]
fn error_roundtrip_and_fatality() {
    let e = BarstoreError::range_unavailable("1m");
    assert!(e.is_fatal());
    assert_eq!(e.to_string(), "no available data range for frequency 1m");

    let json = serde_json::to_string(&e).expect("serialize error");
    let de: BarstoreError = serde_json::from_str(&json).expect("deserialize error");
    assert_eq!(de, e);

    assert!(!BarstoreError::InvalidArg("x".into()).is_fatal());
    assert!(BarstoreError::store("memory", "boom").is_fatal());
}
