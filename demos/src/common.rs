use std::sync::Arc;

use barstore::{Barstore, BarstoreError};
use barstore_mock::{MemoryStore, MemoryWindowReader, MockMinuteSource, fixtures};

/// Store seeded with the fixture collections.
#[must_use]
pub fn sample_store() -> Arc<MemoryStore> {
    Arc::new(fixtures::sample_store())
}

/// Engine over `store`, serving one day of `600000` minute bars.
///
/// # Errors
/// Returns `InvalidArg` if the builder rejects the configuration.
pub fn engine_over(store: Arc<MemoryStore>) -> Result<Barstore, BarstoreError> {
    let minutes = MockMinuteSource::new().with_table(
        format!("{}.XSHG", fixtures::STOCK_CODE),
        fixtures::minute_bars("2020-01-02", &fixtures::SESSION_TIMES, 10.0),
    );
    Barstore::builder()
        .store(store.clone())
        .window_reader(Arc::new(MemoryWindowReader::new(store)))
        .minute_source(Arc::new(minutes))
        .build()
}

/// Engine over the fixture store.
///
/// # Errors
/// As [`engine_over`].
pub fn engine() -> Result<Barstore, BarstoreError> {
    engine_over(sample_store())
}

/// Render a bar table as aligned text rows.
#[must_use]
pub fn render(bars: &barstore::BarTable) -> String {
    let names: Vec<&str> = bars.field_names().collect();
    let mut out = format!("{:<16}", "datetime");
    for n in &names {
        out.push_str(&format!("{n:>12}"));
    }
    out.push('\n');
    for (i, ts) in bars.datetime().iter().enumerate() {
        out.push_str(&format!("{ts:<16}"));
        for n in &names {
            let v = bars.column(n).map_or(f64::NAN, |c| c[i]);
            out.push_str(&format!("{v:>12.2}"));
        }
        out.push('\n');
    }
    out
}
