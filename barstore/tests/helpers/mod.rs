// Shared fixtures so tests can `use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;

use barstore::{Barstore, BarstoreBuilder, Instrument, InstrumentKind};
use barstore_mock::{MemoryStore, MemoryWindowReader, MockMinuteSource, fixtures};
use chrono::{NaiveDate, NaiveDateTime};

pub use barstore_mock::fixtures::{INDEX_CODE, SESSION_TIMES, STOCK_CODE};

/// Engine plus handles on its collaborators for call-count assertions.
pub struct Harness {
    pub engine: Barstore,
    pub store: Arc<MemoryStore>,
    pub reader: Arc<MemoryWindowReader>,
    pub minutes: Arc<MockMinuteSource>,
}

/// Builder wired to `store` with the given minute source, default config.
pub fn builder_with(store: Arc<MemoryStore>, minutes: Arc<MockMinuteSource>) -> BarstoreBuilder {
    Barstore::builder()
        .store(store.clone())
        .window_reader(Arc::new(MemoryWindowReader::new(store)))
        .minute_source(minutes)
}

pub fn harness_with(store: MemoryStore, minutes: MockMinuteSource) -> Harness {
    let store = Arc::new(store);
    let reader = Arc::new(MemoryWindowReader::new(store.clone()));
    let minutes = Arc::new(minutes);
    let engine = Barstore::builder()
        .store(store.clone())
        .window_reader(reader.clone())
        .minute_source(minutes.clone())
        .build()
        .unwrap();
    Harness {
        engine,
        store,
        reader,
        minutes,
    }
}

/// Engine over `fixtures::sample_store()` and an empty minute source.
pub fn harness() -> Harness {
    harness_with(fixtures::sample_store(), MockMinuteSource::new())
}

pub fn index() -> Instrument {
    Instrument::new(format!("{INDEX_CODE}.XSHG"), InstrumentKind::Index).unwrap()
}

pub fn stock() -> Instrument {
    Instrument::new(format!("{STOCK_CODE}.XSHG"), InstrumentKind::Equity).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32, ss: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(hh, mm, ss).unwrap()
}
