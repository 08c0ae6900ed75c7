//! Packed date/time integers.
//!
//! Bars carry their timestamp as a single `i64` laid out as `YYYYMMDDHHMMSS`
//! (e.g. `20200102093100`). Dates pack to the same layout with a zero time part,
//! so day and intraday timestamps compare on one axis.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

const DATE_SCALE: i64 = 1_000_000;

/// Pack a calendar date as `YYYYMMDD000000`.
#[must_use]
pub fn pack_date(date: NaiveDate) -> i64 {
    let ymd = i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day());
    ymd * DATE_SCALE
}

/// Pack a wall-clock time as `HHMMSS`.
#[must_use]
pub fn pack_time(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 10_000 + i64::from(time.minute()) * 100 + i64::from(time.second())
}

/// Pack a date-time as `YYYYMMDDHHMMSS`.
#[must_use]
pub fn pack_datetime(dt: NaiveDateTime) -> i64 {
    pack_date(dt.date()) + pack_time(dt.time())
}

/// Inverse of [`pack_datetime`]. Returns `None` for out-of-range components.
#[must_use]
pub fn unpack_datetime(packed: i64) -> Option<NaiveDateTime> {
    let ymd = packed.div_euclid(DATE_SCALE);
    let hms = packed.rem_euclid(DATE_SCALE);
    let year = i32::try_from(ymd / 10_000).ok()?;
    let month = u32::try_from(ymd / 100 % 100).ok()?;
    let day = u32::try_from(ymd % 100).ok()?;
    let hour = u32::try_from(hms / 10_000).ok()?;
    let minute = u32::try_from(hms / 100 % 100).ok()?;
    let second = u32::try_from(hms % 100).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

/// Parse a timestamp as the store writes it.
///
/// Accepts `YYYY-MM-DD HH:MM:SS`, the `T`-separated ISO form, either with
/// fractional seconds, and bare `YYYY-MM-DD` dates (midnight).
#[must_use]
pub fn parse_store_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Format a date-time the way the store writes it (`YYYY-MM-DD HH:MM:SS`).
#[must_use]
pub fn format_store_datetime(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
