use barstore::{BarTable, DATETIME, FieldValue, FindQuery, TimeWindow, fetch_bars};
use barstore_core::trim_window;
use barstore_mock::{MemoryStore, fixtures};
use serde_json::json;

fn shard(datetime: serde_json::Value, close: &[f64]) -> barstore::Document {
    json!({"_l": close.len(), "datetime": datetime, "close": close})
        .as_object()
        .cloned()
        .unwrap()
}

async fn fetch_all(store: &MemoryStore) -> Option<BarTable> {
    let query = FindQuery::new(fixtures::namespace("stock_min"), json!({}));
    fetch_bars(store, query, FieldValue::nan())
        .await
        .unwrap()
        .map(|m| BarTable::from_merged(m, DATETIME).unwrap())
}

#[tokio::test]
async fn mixed_timestamp_formats_trim_on_instants() {
    let store = MemoryStore::new().with_documents(
        &fixtures::namespace("stock_min"),
        [
            shard(json!([20_200_103_093_100.0]), &[3.0]),
            shard(json!(["2020-01-02T11:00:00"]), &[2.0]),
            shard(json!(["2020-01-02 10:00:00"]), &[1.0]),
        ],
    );
    let bars = fetch_all(&store).await.unwrap();
    assert_eq!(
        bars.datetime(),
        &[20_200_102_100_000, 20_200_102_110_000, 20_200_103_093_100]
    );
    assert_eq!(bars.column("close").unwrap(), &[1.0, 2.0, 3.0]);

    let morning = trim_window(
        Some(bars.clone()),
        TimeWindow::new(20_200_102_100_000, 20_200_102_103_000),
    );
    assert_eq!(morning.datetime(), &[20_200_102_100_000]);

    let first_day = trim_window(
        Some(bars),
        TimeWindow::new(20_200_102_000_000, 20_200_102_235_959),
    );
    assert_eq!(
        first_day.datetime(),
        &[20_200_102_100_000, 20_200_102_110_000]
    );
}

#[tokio::test]
async fn implausible_shard_length_is_skipped() {
    let mut corrupt = shard(json!(["2020-01-02 09:31:00"]), &[9.0]);
    corrupt.insert("_l".into(), json!(1e18));
    let store = MemoryStore::new().with_documents(
        &fixtures::namespace("stock_min"),
        [corrupt, shard(json!(["2020-01-02 09:32:00"]), &[1.0])],
    );
    let bars = fetch_all(&store).await.unwrap();
    assert_eq!(bars.datetime(), &[20_200_102_093_200]);
    assert_eq!(bars.column("close").unwrap(), &[1.0]);
}

#[tokio::test]
async fn empty_cursor_is_no_data() {
    let store = MemoryStore::new();
    assert!(fetch_all(&store).await.is_none());
}
