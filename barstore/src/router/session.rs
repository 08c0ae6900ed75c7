use barstore_core::time::{format_store_datetime, unpack_datetime};
use barstore_core::{
    BarTable, BarstoreError, Capability, DATETIME, FieldValue, FindQuery, Instrument,
    SessionParams, TimeWindow, trim_window,
};
use serde_json::{Value, json};

use super::fetch::fetch_bars;
use crate::Barstore;

/// Bookkeeping fields left out of every shard read.
fn shard_projection() -> Value {
    json!({"_id": 0, "_d": 0})
}

impl Barstore {
    /// One-minute bars for `instrument` across a run of trading sessions.
    ///
    /// The window runs from the first block's date and start time (midnight
    /// when absent) to the last block's date and end time (the configured
    /// session end when absent). Shards are fetched from the instrument's
    /// minute collection, merged, sorted, and trimmed to that window.
    ///
    /// # Errors
    /// `InvalidArg` for an empty block list or out-of-range times,
    /// `Unsupported` for instrument kinds without collections, and store
    /// errors or timeouts from the fetch.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barstore::router::bars_in_sessions",
            skip(self, instrument, sessions),
            fields(
                order_book_id = instrument.order_book_id(),
                sessions = sessions.len(),
            ),
        )
    )]
    pub async fn bars_in_sessions(
        &self,
        instrument: &Instrument,
        sessions: &[SessionParams],
    ) -> Result<BarTable, BarstoreError> {
        let window = TimeWindow::from_sessions(sessions, self.cfg.session_end_time)?;
        let pair = self.collections_for(instrument)?;
        let (Some(lo), Some(hi)) = (unpack_datetime(window.start), unpack_datetime(window.end))
        else {
            return Err(BarstoreError::InvalidArg(format!(
                "session window {}..={} is not a pair of valid instants",
                window.start, window.end
            )));
        };

        let filter = json!({
            "datetime": {
                "$gte": format_store_datetime(lo),
                "$lte": format_store_datetime(hi),
            },
            "code": instrument.code(),
            "type": self.cfg.minute_type_tag,
        });
        let query = FindQuery::new(self.namespace(&pair.minute), filter)
            .projection(shard_projection());

        let merged = self
            .with_query_timeout(
                Capability::SessionBars,
                fetch_bars(self.store.as_ref(), query, FieldValue::nan()),
            )
            .await?;
        let table = merged
            .map(|m| BarTable::from_merged(m, DATETIME))
            .transpose()?;
        Ok(trim_window(table, window))
    }
}
