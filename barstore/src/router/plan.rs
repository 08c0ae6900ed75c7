use barstore_core::time::pack_time;
use barstore_core::{
    BarRequest, BarTable, BarstoreError, Capability, Frequency, FrequencyUnit, Instrument,
    SessionParams, SortSpec, WindowRead,
};

use crate::Barstore;

/// Field the day collections are indexed and sorted by.
const DAY_INDEX: &str = "date";

/// Fetch path chosen for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchPlan {
    /// Delegate to the external minute-bar source unchanged.
    Minute,
    /// Read day rows through the window reader.
    Day,
    /// Assemble intraday bars from one-minute shards over session blocks.
    OtherIntraday,
}

impl FetchPlan {
    /// Plan for a frequency, decided by its unit alone.
    #[must_use]
    pub const fn for_frequency(frequency: Frequency) -> Self {
        match frequency.unit() {
            FrequencyUnit::Minute => Self::Minute,
            FrequencyUnit::Day => Self::Day,
            FrequencyUnit::Hour => Self::OtherIntraday,
        }
    }

    /// Capability label used in errors and telemetry.
    #[must_use]
    pub const fn capability(self) -> Capability {
        match self {
            Self::Minute => Capability::MinuteBars,
            Self::Day => Capability::DayBars,
            Self::OtherIntraday => Capability::SessionBars,
        }
    }
}

impl Barstore {
    /// Bars for `instrument` at `req.frequency`.
    ///
    /// - Minute frequencies go to the minute source with window and length
    ///   untouched.
    /// - Day frequencies read the instrument's day collection by `date`,
    ///   ascending, with the window dates and length passed to the reader.
    /// - Hour frequencies assemble one-minute shards between `start` and
    ///   `end` (end of session when absent); `length` keeps the last rows.
    ///
    /// An empty window yields [`BarTable::empty`].
    ///
    /// # Errors
    /// `Unsupported` for instrument kinds without collections (day and hour
    /// paths), `InvalidArg` for an hour request without a start, and store
    /// errors or timeouts from the underlying fetch.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "barstore::router::raw_history_bars",
            skip(self, instrument, req),
            fields(
                order_book_id = instrument.order_book_id(),
                frequency = %req.frequency,
                plan = ?FetchPlan::for_frequency(req.frequency),
            ),
        )
    )]
    pub async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        let plan = FetchPlan::for_frequency(req.frequency);
        match plan {
            FetchPlan::Minute => {
                self.with_query_timeout(
                    plan.capability(),
                    self.minute_source.raw_history_bars(
                        instrument,
                        req.frequency,
                        req.start,
                        req.end,
                        req.length,
                    ),
                )
                .await
            }
            FetchPlan::Day => self.day_bars(instrument, req).await,
            FetchPlan::OtherIntraday => self.intraday_bars(instrument, req).await,
        }
    }

    async fn day_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        let pair = self.collections_for(instrument)?;
        let read = WindowRead {
            ns: self.namespace(&pair.day),
            code: instrument.code().to_string(),
            index: DAY_INDEX.to_string(),
            start: req.start.map(|dt| dt.date()),
            end: req.end.map(|dt| dt.date()),
            length: req.length,
            sort: SortSpec::ascending(DAY_INDEX),
        };
        let rows = self
            .with_query_timeout(Capability::DayBars, self.window_reader.read(read))
            .await?;
        match rows {
            Some(rows) if !rows.is_empty() => BarTable::from_merged(rows, DAY_INDEX),
            _ => Ok(BarTable::empty()),
        }
    }

    async fn intraday_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        let Some(start) = req.start else {
            return Err(BarstoreError::InvalidArg(format!(
                "{} bars need a start instant",
                req.frequency
            )));
        };
        let first = SessionParams::day(start.date()).starting_at(pack_time(start.time()));
        let blocks = match req.end {
            Some(end) => vec![first, SessionParams::day(end.date()).ending_at(pack_time(end.time()))],
            None => vec![first],
        };
        let bars = self.bars_in_sessions(instrument, &blocks).await?;
        Ok(match req.length {
            Some(n) => bars.tail(n),
            None => bars,
        })
    }
}
