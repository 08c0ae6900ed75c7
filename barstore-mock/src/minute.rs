use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use barstore_core::time::pack_datetime;
use barstore_core::{
    BarTable, BarstoreError, Frequency, Instrument, MinuteBarSource, TimeWindow, trim_window,
};
use chrono::NaiveDateTime;

/// Arguments of one `raw_history_bars` call, as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinuteCall {
    /// Order-book id of the requested instrument.
    pub order_book_id: String,
    /// Requested frequency.
    pub frequency: Frequency,
    /// Requested start.
    pub start: Option<NaiveDateTime>,
    /// Requested end.
    pub end: Option<NaiveDateTime>,
    /// Requested length.
    pub length: Option<usize>,
}

/// Minute-bar source serving fixed tables per order-book id.
///
/// Unknown instruments yield the typed empty table. Every call is recorded
/// so tests can check that arguments pass through unchanged.
#[derive(Default)]
pub struct MockMinuteSource {
    tables: HashMap<String, BarTable>,
    calls: Mutex<Vec<MinuteCall>>,
    failing: AtomicBool,
}

impl MockMinuteSource {
    /// Source with no tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `table` for `order_book_id`.
    #[must_use]
    pub fn with_table(mut self, order_book_id: impl Into<String>, table: BarTable) -> Self {
        self.tables.insert(order_book_id.into(), table);
        self
    }

    /// Calls received so far, oldest first.
    pub fn calls(&self) -> Vec<MinuteCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every subsequent call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MinuteBarSource for MockMinuteSource {
    async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        frequency: Frequency,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        length: Option<usize>,
    ) -> Result<BarTable, BarstoreError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(MinuteCall {
                order_book_id: instrument.order_book_id().to_string(),
                frequency,
                start,
                end,
                length,
            });
        if self.failing.load(Ordering::SeqCst) {
            return Err(BarstoreError::store(
                "mock-minute",
                format!("forced failure: {}", instrument.order_book_id()),
            ));
        }

        let table = self.tables.get(instrument.order_book_id()).cloned();
        let window = TimeWindow::new(
            start.map_or(i64::MIN, pack_datetime),
            end.map_or(i64::MAX, pack_datetime),
        );
        let bars = trim_window(table, window);
        Ok(match length {
            Some(n) => bars.tail(n),
            None => bars,
        })
    }
}
