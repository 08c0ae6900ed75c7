use core::fmt;
use core::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::BarstoreError;
use crate::time::pack_date;

/// Enumerated instrument kind, as assigned by instrument metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum InstrumentKind {
    /// Common stock.
    Equity,
    /// Market index.
    Index,
    /// Exchange-traded or listed fund.
    Fund,
    /// Futures contract.
    Future,
}

impl InstrumentKind {
    /// Storage family for this kind (`"stock"` or `"index"`), if the store
    /// keeps bars for it.
    #[must_use]
    pub const fn family(self) -> Option<&'static str> {
        match self {
            Self::Equity => Some("stock"),
            Self::Index => Some("index"),
            Self::Fund | Self::Future => None,
        }
    }
}

/// An instrument identified by its order-book id and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    order_book_id: String,
    kind: InstrumentKind,
}

impl Instrument {
    /// Build an instrument from an order-book id such as `000001.XSHE`.
    ///
    /// # Errors
    /// Returns `InvalidArg` if the id is empty or has an empty code part.
    pub fn new(order_book_id: impl Into<String>, kind: InstrumentKind) -> Result<Self, BarstoreError> {
        let order_book_id = order_book_id.into();
        let trimmed = order_book_id.trim();
        if trimmed.is_empty() || trimmed.starts_with('.') {
            return Err(BarstoreError::InvalidArg(format!(
                "order book id must carry a code: {order_book_id:?}"
            )));
        }
        Ok(Self {
            order_book_id: trimmed.to_string(),
            kind,
        })
    }

    /// Full order-book id, exchange suffix included.
    #[must_use]
    pub fn order_book_id(&self) -> &str {
        &self.order_book_id
    }

    /// Instrument kind.
    #[must_use]
    pub const fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// Raw store code: the order-book id with any `.EXCHANGE` suffix removed.
    #[must_use]
    pub fn code(&self) -> &str {
        self.order_book_id
            .split_once('.')
            .map_or(self.order_book_id.as_str(), |(code, _)| code)
    }
}

/// Unit suffix of a frequency tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrequencyUnit {
    /// `d`
    Day,
    /// `h`
    Hour,
    /// `m`
    Minute,
}

impl FrequencyUnit {
    const fn suffix(self) -> char {
        match self {
            Self::Day => 'd',
            Self::Hour => 'h',
            Self::Minute => 'm',
        }
    }
}

/// Sampling frequency such as `1d`, `5m`, or `1h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Frequency {
    count: u32,
    unit: FrequencyUnit,
}

impl Frequency {
    /// One day.
    pub const DAILY: Self = Self {
        count: 1,
        unit: FrequencyUnit::Day,
    };
    /// One minute.
    pub const MINUTE: Self = Self {
        count: 1,
        unit: FrequencyUnit::Minute,
    };
    /// One hour.
    pub const HOURLY: Self = Self {
        count: 1,
        unit: FrequencyUnit::Hour,
    };

    /// Build a frequency from a positive count and a unit.
    ///
    /// # Errors
    /// Returns `InvalidArg` if `count` is zero.
    pub fn new(count: u32, unit: FrequencyUnit) -> Result<Self, BarstoreError> {
        if count == 0 {
            return Err(BarstoreError::InvalidArg(
                "frequency count must be positive".into(),
            ));
        }
        Ok(Self { count, unit })
    }

    /// Number of units per bar.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.count
    }

    /// Unit suffix.
    #[must_use]
    pub const fn unit(self) -> FrequencyUnit {
        self.unit
    }

    /// True for sub-day units (minute and hour).
    #[must_use]
    pub const fn is_intraday(self) -> bool {
        !matches!(self.unit, FrequencyUnit::Day)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for Frequency {
    type Err = BarstoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || BarstoreError::InvalidArg(format!("unrecognized frequency: {s:?}"));
        let mut chars = s.chars();
        let unit = match chars.next_back().ok_or_else(invalid)? {
            'd' => FrequencyUnit::Day,
            'h' => FrequencyUnit::Hour,
            'm' => FrequencyUnit::Minute,
            _ => return Err(invalid()),
        };
        let count = chars.as_str().parse::<u32>().map_err(|_| invalid())?;
        Self::new(count, unit)
    }
}

impl TryFrom<&str> for Frequency {
    type Error = BarstoreError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Parameters for one trading session inside a request window.
///
/// Times are packed `HHMMSS` integers; absent times default to the start of
/// the day and the configured end of session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionParams {
    /// Trading date of the session.
    pub trade_date: NaiveDate,
    /// Optional start time (`HHMMSS`).
    pub start_time: Option<i64>,
    /// Optional end time (`HHMMSS`).
    pub end_time: Option<i64>,
}

impl SessionParams {
    /// A full session on `trade_date`.
    #[must_use]
    pub const fn day(trade_date: NaiveDate) -> Self {
        Self {
            trade_date,
            start_time: None,
            end_time: None,
        }
    }

    /// Set the start time (`HHMMSS`).
    #[must_use]
    pub const fn starting_at(mut self, hhmmss: i64) -> Self {
        self.start_time = Some(hhmmss);
        self
    }

    /// Set the end time (`HHMMSS`).
    #[must_use]
    pub const fn ending_at(mut self, hhmmss: i64) -> Self {
        self.end_time = Some(hhmmss);
        self
    }
}

/// Closed window `[start, end]` over packed `YYYYMMDDHHMMSS` instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: i64,
    /// Inclusive upper bound.
    pub end: i64,
}

impl TimeWindow {
    /// Build a window from packed bounds.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Derive the effective window from per-session blocks: the first block's
    /// date and start time (default `0`) through the last block's date and end
    /// time (default `session_end`).
    ///
    /// # Errors
    /// Returns `InvalidArg` when `sessions` is empty.
    pub fn from_sessions(sessions: &[SessionParams], session_end: i64) -> Result<Self, BarstoreError> {
        let (Some(first), Some(last)) = (sessions.first(), sessions.last()) else {
            return Err(BarstoreError::InvalidArg(
                "at least one session block is required".into(),
            ));
        };
        let start = pack_date(first.trade_date) + first.start_time.unwrap_or(0);
        let end = pack_date(last.trade_date) + last.end_time.unwrap_or(session_end);
        Ok(Self { start, end })
    }

    /// True when `ts` lies inside the window.
    #[must_use]
    pub const fn contains(&self, ts: i64) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// Bar request parameters shared by every bar source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BarRequest {
    /// Sampling frequency.
    pub frequency: Frequency,
    /// Optional inclusive start instant.
    pub start: Option<NaiveDateTime>,
    /// Optional inclusive end instant.
    pub end: Option<NaiveDateTime>,
    /// Optional maximum number of bars.
    pub length: Option<usize>,
}

impl BarRequest {
    /// Unbounded request at `frequency`.
    #[must_use]
    pub const fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            start: None,
            end: None,
            length: None,
        }
    }

    /// Set the inclusive start instant.
    #[must_use]
    pub const fn start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Set the inclusive end instant.
    #[must_use]
    pub const fn end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Bound the number of returned bars.
    #[must_use]
    pub const fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frequency_tags() {
        let f: Frequency = "1d".parse().unwrap();
        assert_eq!(f, Frequency::DAILY);
        let f: Frequency = "15m".parse().unwrap();
        assert_eq!(f.count(), 15);
        assert_eq!(f.unit(), FrequencyUnit::Minute);
        assert!(f.is_intraday());
        assert_eq!(f.to_string(), "15m");
        assert_eq!(Frequency::try_from("1h").unwrap(), Frequency::HOURLY);

        for bad in ["", "d", "0d", "1w", "-1m", "1.5h"] {
            assert!(bad.parse::<Frequency>().is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn strips_exchange_suffix() {
        let i = Instrument::new("000001.XSHE", InstrumentKind::Equity).unwrap();
        assert_eq!(i.code(), "000001");
        assert_eq!(i.order_book_id(), "000001.XSHE");
        let plain = Instrument::new("600000", InstrumentKind::Equity).unwrap();
        assert_eq!(plain.code(), "600000");
        assert!(Instrument::new(".XSHE", InstrumentKind::Index).is_err());
        assert!(Instrument::new("  ", InstrumentKind::Index).is_err());
    }

    #[test]
    fn window_from_sessions_uses_first_and_last_blocks() {
        let d1 = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2020, 1, 6).unwrap();
        let w = TimeWindow::from_sessions(
            &[
                SessionParams::day(d1).starting_at(93_100),
                SessionParams::day(d2).ending_at(100_000),
                SessionParams::day(d3),
            ],
            150_000,
        )
        .unwrap();
        assert_eq!(w.start, 20_200_102_093_100);
        assert_eq!(w.end, 20_200_106_150_000);

        let w = TimeWindow::from_sessions(&[SessionParams::day(d1).ending_at(113_000)], 150_000)
            .unwrap();
        assert_eq!(w, TimeWindow::new(20_200_102_000_000, 20_200_102_113_000));
        assert!(w.contains(20_200_102_113_000));
        assert!(!w.contains(20_200_102_113_001));

        assert!(TimeWindow::from_sessions(&[], 150_000).is_err());
    }
}
