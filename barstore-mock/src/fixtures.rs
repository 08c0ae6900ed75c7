//! Deterministic documents shaped like the production collections.
//!
//! Day collections hold one row document per bar; minute collections hold one
//! shard per trading day with parallel arrays and a declared length `_l`.

use std::collections::BTreeMap;

use barstore_core::time::{pack_datetime, parse_store_datetime};
use barstore_core::{BarTable, Document, Namespace};
use serde_json::{Value, json};

use crate::MemoryStore;

/// Database the fixtures live in.
pub const DATABASE: &str = "quantaxis";
/// Benchmark index code; also the reference instrument for minute coverage.
pub const INDEX_CODE: &str = "000001";
/// Equity code with day and minute data.
pub const STOCK_CODE: &str = "600000";
/// Bar times present in every full minute shard.
pub const SESSION_TIMES: [&str; 4] = ["09:31:00", "09:32:00", "14:59:00", "15:00:00"];

/// Namespace of `collection` in the fixture database.
#[must_use]
pub fn namespace(collection: &str) -> Namespace {
    Namespace::new(DATABASE, collection)
}

fn object(v: Value) -> Document {
    match v {
        Value::Object(map) => map,
        _ => Document::new(),
    }
}

/// One day-level row document.
#[must_use]
pub fn day_row(code: &str, date: &str, close: f64, volume: f64) -> Document {
    object(json!({
        "_id": format!("{code}-{date}"),
        "code": code,
        "date": date,
        "open": close - 0.5,
        "high": close + 1.0,
        "low": close - 1.0,
        "close": close,
        "volume": volume,
    }))
}

/// One day-level shard document: a single bar with `date` and `close` arrays
/// and `_l` of one.
#[must_use]
pub fn day_shard(code: &str, date: &str, close: f64) -> Document {
    object(json!({
        "_id": format!("{code}-{date}"),
        "_l": 1,
        "code": code,
        "date": [date],
        "close": [close],
    }))
}

/// One minute shard for `trade_date` with a bar at each of `times`.
///
/// Closes step up by `0.1` from `base`; every other field derives from them.
#[must_use]
pub fn minute_shard(code: &str, trade_date: &str, times: &[&str], base: f64) -> Document {
    let datetime: Vec<String> = times.iter().map(|t| format!("{trade_date} {t}")).collect();
    let close: Vec<f64> = (0..times.len()).map(|i| step(base, i)).collect();
    object(json!({
        "_id": format!("{code}-{trade_date}-1min"),
        "_d": trade_date,
        "_l": times.len(),
        "code": code,
        "type": "1min",
        "datetime": datetime,
        "open": close.iter().map(|c| c - 0.05).collect::<Vec<_>>(),
        "high": close.iter().map(|c| c + 0.1).collect::<Vec<_>>(),
        "low": close.iter().map(|c| c - 0.1).collect::<Vec<_>>(),
        "close": close,
        "volume": (0..times.len()).map(|i| 100.0 * (i + 1) as f64).collect::<Vec<_>>(),
    }))
}

fn step(base: f64, i: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let offset = i as f64 * 0.1;
    base + offset
}

/// Minute bars as the external minute path would return them.
#[must_use]
pub fn minute_bars(trade_date: &str, times: &[&str], base: f64) -> BarTable {
    let datetime: Vec<i64> = times
        .iter()
        .filter_map(|t| parse_store_datetime(&format!("{trade_date} {t}")))
        .map(pack_datetime)
        .collect();
    let close: Vec<f64> = (0..datetime.len()).map(|i| step(base, i)).collect();
    let mut columns = BTreeMap::new();
    columns.insert("close".to_string(), close);
    BarTable::new(datetime, columns).unwrap_or_else(|_| BarTable::empty())
}

/// Store populated with a small, irregular data set:
///
/// - `index_day`: two `000001` single-bar shards stored newest first, plus an
///   unrelated code stored as a plain row;
/// - `stock_day`: four `600000` rows;
/// - `index_min`: two `000001` one-minute shards stored newest first, plus a
///   five-minute shard that one-minute queries must ignore;
/// - `stock_min`: two `600000` shards, the later one stored first, missing
///   `volume` and carrying a malformed `open` array.
#[must_use]
pub fn sample_store() -> MemoryStore {
    let mut late = minute_shard(STOCK_CODE, "2020-01-03", &SESSION_TIMES, 10.4);
    late.remove("volume");
    late.insert("open".into(), json!([10.35]));

    let mut five = minute_shard(INDEX_CODE, "2020-01-06", &["09:35:00"], 3100.0);
    five.insert("type".into(), json!("5min"));

    MemoryStore::new()
        .with_documents(
            &namespace("index_day"),
            [
                day_shard(INDEX_CODE, "2020-01-03", 3083.79),
                day_shard(INDEX_CODE, "2020-01-02", 3085.20),
                day_row("399001", "2020-01-02", 10_638.8, 3.1e10),
            ],
        )
        .with_documents(
            &namespace("stock_day"),
            [
                day_row(STOCK_CODE, "2020-01-02", 12.47, 1.2e7),
                day_row(STOCK_CODE, "2020-01-03", 12.60, 1.1e7),
                day_row(STOCK_CODE, "2020-01-06", 12.46, 1.0e7),
                day_row(STOCK_CODE, "2020-01-07", 12.50, 0.9e7),
            ],
        )
        .with_documents(
            &namespace("index_min"),
            [
                minute_shard(INDEX_CODE, "2020-01-03", &SESSION_TIMES, 3080.0),
                minute_shard(INDEX_CODE, "2020-01-02", &SESSION_TIMES, 3070.0),
                five,
            ],
        )
        .with_documents(
            &namespace("stock_min"),
            [
                late,
                minute_shard(STOCK_CODE, "2020-01-02", &SESSION_TIMES, 10.0),
            ],
        )
}
