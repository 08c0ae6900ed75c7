use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::BarstoreError;
use crate::document::{Document, Filter, FindQuery, Namespace, SortSpec};
use crate::domain::{BarRequest, Frequency, Instrument};
use crate::timeseries::merge::MergedTable;
use crate::timeseries::table::BarTable;

/// Cursor over the documents matching a query, in store iteration order.
pub type DocumentStream = BoxStream<'static, Result<Document, BarstoreError>>;

/// Read-only interface to the document store holding bar shards.
///
/// Implementations own connection handling. Errors are reported as
/// `BarstoreError::Store` and are never retried by callers.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Human-readable store name used in errors and telemetry.
    fn name(&self) -> &'static str;

    /// Open a cursor over every document matching `query`.
    async fn find(&self, query: FindQuery) -> Result<DocumentStream, BarstoreError>;

    /// Return at most `limit` matching documents ordered by `sort`.
    async fn find_sorted(
        &self,
        ns: &Namespace,
        filter: &Filter,
        sort: &SortSpec,
        limit: usize,
    ) -> Result<Vec<Document>, BarstoreError>;
}

/// Parameters for a generic read-by-window lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRead {
    /// Collection to read.
    pub ns: Namespace,
    /// Raw instrument code.
    pub code: String,
    /// Field the window applies to (e.g. `"date"`).
    pub index: String,
    /// Optional inclusive start date.
    pub start: Option<NaiveDate>,
    /// Optional inclusive end date.
    pub end: Option<NaiveDate>,
    /// Optional number of rows to return.
    pub length: Option<usize>,
    /// Result ordering.
    pub sort: SortSpec,
}

/// Generic accessor that reads a window of rows for one code.
///
/// The reader resolves date/length bounds and ordering itself; `Ok(None)`
/// means nothing matched.
#[async_trait]
pub trait WindowReader: Send + Sync {
    /// Read the rows selected by `req`.
    async fn read(&self, req: WindowRead) -> Result<Option<MergedTable>, BarstoreError>;
}

/// External fetch path serving minute bars.
#[async_trait]
pub trait MinuteBarSource: Send + Sync {
    /// Fetch minute bars; window and length are passed through unchanged.
    async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        frequency: Frequency,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
        length: Option<usize>,
    ) -> Result<BarTable, BarstoreError>;
}

/// Caller-facing bar source.
///
/// An empty result is `Ok(BarTable::empty())`, never an error.
#[async_trait]
pub trait BarSource: Send + Sync {
    /// Human-readable name used in telemetry.
    fn name(&self) -> &'static str;

    /// Bars for `instrument` as described by `req`.
    async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError>;

    /// Earliest and latest dates for which `frequency` has data.
    async fn available_data_range(
        &self,
        frequency: Frequency,
    ) -> Result<(NaiveDate, NaiveDate), BarstoreError>;
}
