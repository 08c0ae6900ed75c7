mod helpers;

use std::time::Duration;

use barstore::{BarstoreError, Frequency};
use barstore_mock::{MemoryStore, MockMinuteSource};
use chrono::{Days, Local};
use helpers::*;

#[tokio::test]
async fn minute_range_comes_from_the_reference_instrument() {
    let h = harness();
    let range = h.engine.available_data_range(Frequency::MINUTE).await.unwrap();
    // The five-minute shard on 2020-01-06 does not count.
    assert_eq!(range, (day(2020, 1, 2), day(2020, 1, 3)));
    assert_eq!(h.store.find_sorted_calls(), 2);
}

#[tokio::test]
async fn minute_range_is_memoized_per_frequency() {
    let h = harness();
    for _ in 0..3 {
        h.engine.available_data_range(Frequency::MINUTE).await.unwrap();
    }
    assert_eq!(h.store.find_sorted_calls(), 2);

    let five: Frequency = "5m".parse().unwrap();
    let range = h.engine.available_data_range(five).await.unwrap();
    assert_eq!(range, (day(2020, 1, 2), day(2020, 1, 3)));
    assert_eq!(h.store.find_sorted_calls(), 4);
}

#[tokio::test]
async fn concurrent_first_lookups_share_one_probe() {
    let h = harness();
    h.store.set_latency(Duration::from_millis(20));
    let (a, b, c) = tokio::join!(
        h.engine.available_data_range(Frequency::MINUTE),
        h.engine.available_data_range(Frequency::MINUTE),
        h.engine.available_data_range(Frequency::MINUTE),
    );
    assert_eq!(a.unwrap(), b.unwrap());
    assert!(c.is_ok());
    assert_eq!(h.store.find_sorted_calls(), 2);
}

#[tokio::test]
async fn day_and_hour_ranges_never_touch_the_store() {
    let h = harness();
    let yesterday = Local::now()
        .date_naive()
        .checked_sub_days(Days::new(1))
        .unwrap();
    for freq in [Frequency::DAILY, Frequency::HOURLY] {
        let (first, last) = h.engine.available_data_range(freq).await.unwrap();
        assert_eq!(first, day(2012, 6, 1));
        assert!(last >= yesterday && last < Local::now().date_naive());
    }
    assert_eq!(h.store.find_sorted_calls(), 0);
    assert_eq!(h.store.find_calls(), 0);
}

#[tokio::test]
async fn configured_epoch_is_reported() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let engine = builder_with(store, std::sync::Arc::new(MockMinuteSource::new()))
        .daily_epoch(day(2005, 1, 4))
        .build()
        .unwrap();
    let (first, _) = engine.available_data_range(Frequency::DAILY).await.unwrap();
    assert_eq!(first, day(2005, 1, 4));
}

#[tokio::test]
async fn empty_store_has_no_minute_range_and_is_not_memoized() {
    let h = harness_with(MemoryStore::new(), MockMinuteSource::new());
    let err = h
        .engine
        .available_data_range(Frequency::MINUTE)
        .await
        .unwrap_err();
    assert_eq!(err, BarstoreError::range_unavailable("1m"));
    assert!(err.is_fatal());

    h.engine
        .available_data_range(Frequency::MINUTE)
        .await
        .unwrap_err();
    assert_eq!(h.store.find_sorted_calls(), 4);
}

#[tokio::test]
async fn store_errors_are_retried_on_next_call() {
    let h = harness();
    h.store.set_failing(true);
    let err = h
        .engine
        .available_data_range(Frequency::MINUTE)
        .await
        .unwrap_err();
    assert!(matches!(err, BarstoreError::Store { .. }));

    h.store.set_failing(false);
    let range = h.engine.available_data_range(Frequency::MINUTE).await.unwrap();
    assert_eq!(range.0, day(2020, 1, 2));
}

#[tokio::test(start_paused = true)]
async fn slow_store_hits_the_query_timeout() {
    let store = std::sync::Arc::new(barstore_mock::fixtures::sample_store());
    store.set_latency(Duration::from_millis(500));
    let engine = builder_with(store, std::sync::Arc::new(MockMinuteSource::new()))
        .query_timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let err = engine
        .available_data_range(Frequency::MINUTE)
        .await
        .unwrap_err();
    assert_eq!(err, BarstoreError::request_timeout("data-range"));

    let err = engine
        .raw_history_bars(&index(), barstore::BarRequest::new(Frequency::DAILY))
        .await
        .unwrap_err();
    assert_eq!(err, BarstoreError::request_timeout("day-bars"));
}
