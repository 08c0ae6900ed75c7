use core::ops::Range;
use std::collections::BTreeMap;

use crate::BarstoreError;
use crate::document::FieldValue;
use crate::timeseries::merge::MergedTable;

/// Name of the packed timestamp column.
pub const DATETIME: &str = "datetime";

/// Columns carried by the typed empty table.
pub const BAR_FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Fixed-width columnar bar table: a packed `YYYYMMDDHHMMSS` timestamp column
/// plus named `f64` columns of the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BarTable {
    datetime: Vec<i64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl BarTable {
    /// Typed table with zero rows and the standard bar columns.
    ///
    /// This is what callers receive when a window holds no bars; it is
    /// distinct from the `None` "no data" marker produced by the merger.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            datetime: Vec::new(),
            columns: BAR_FIELDS
                .iter()
                .map(|f| ((*f).to_string(), Vec::new()))
                .collect(),
        }
    }

    /// Build a table from a timestamp column and value columns.
    ///
    /// # Errors
    /// Returns `BarstoreError::Data` if any column length differs from the
    /// timestamp column.
    pub fn new(
        datetime: Vec<i64>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, BarstoreError> {
        if let Some((name, col)) = columns.iter().find(|(_, c)| c.len() != datetime.len()) {
            return Err(BarstoreError::Data(format!(
                "column {name} has {} rows, expected {}",
                col.len(),
                datetime.len()
            )));
        }
        Ok(Self { datetime, columns })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.datetime.len()
    }

    /// True when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.datetime.is_empty()
    }

    /// Packed timestamps.
    #[must_use]
    pub fn datetime(&self) -> &[i64] {
        &self.datetime
    }

    /// Value column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Value column names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Copy of the rows in `range`, every column sliced alike.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self {
            datetime: self.datetime[range.clone()].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|(k, v)| (k.clone(), v[range.clone()].to_vec()))
                .collect(),
        }
    }

    /// Keep only the last `n` rows.
    #[must_use]
    pub fn tail(self, n: usize) -> Self {
        let len = self.len();
        if n >= len {
            return self;
        }
        self.slice(len - n..len)
    }

    /// Convert a merged table into a bar table sorted by instant.
    ///
    /// - `time_key` (`"datetime"` or `"date"`) becomes the packed timestamp
    ///   column; rows whose timestamp cannot be read are dropped.
    /// - Columns holding only numbers become `f64` columns.
    /// - Columns carrying any text (codes, tags, raw strings) are dropped.
    /// - Rows are stably ordered by packed instant, whatever mix of text and
    ///   numeric timestamps the shards carried.
    ///
    /// # Errors
    /// Returns `BarstoreError::Data` if the table has rows but no `time_key`
    /// column.
    pub fn from_merged(merged: MergedTable, time_key: &str) -> Result<Self, BarstoreError> {
        let mut columns = merged.into_columns();
        let Some(times) = columns.remove(time_key) else {
            return Err(BarstoreError::Data(format!(
                "merged bars carry no {time_key} column"
            )));
        };
        if time_key != DATETIME {
            columns.remove(DATETIME);
        }

        let packed: Vec<Option<i64>> = times.iter().map(FieldValue::as_packed_time).collect();
        // Readable rows in stable instant order; the trimmer searches this column.
        let mut rows: Vec<(usize, i64)> = packed
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i, t)))
            .collect();
        rows.sort_by_key(|&(_, t)| t);
        let dropped = packed.len() - rows.len();
        if dropped > 0 {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target = "barstore::table",
                dropped,
                time_key,
                "dropping rows with unreadable timestamps"
            );
        }
        let datetime: Vec<i64> = rows.iter().map(|&(_, t)| t).collect();

        let mut out = BTreeMap::new();
        for (name, values) in columns {
            let numeric: Option<Vec<f64>> = rows.iter().map(|&(i, _)| values[i].as_f64()).collect();
            match numeric {
                Some(col) => {
                    out.insert(name, col);
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target = "barstore::table",
                        column = %name,
                        "dropping non-numeric column"
                    );
                }
            }
        }
        Self::new(datetime, out)
    }

    /// Convert into a Polars `DataFrame` with a `datetime` column first.
    ///
    /// # Errors
    /// Propagates Polars construction errors.
    #[cfg(feature = "dataframe")]
    pub fn to_dataframe(&self) -> polars::prelude::PolarsResult<polars::prelude::DataFrame> {
        use polars::prelude::{Column, DataFrame, NamedFrom};

        let mut cols = Vec::with_capacity(self.columns.len() + 1);
        cols.push(Column::new(DATETIME.into(), self.datetime.clone()));
        for (name, values) in &self.columns {
            cols.push(Column::new(name.as_str().into(), values.clone()));
        }
        DataFrame::new(cols)
    }
}
