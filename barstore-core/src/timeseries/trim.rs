use core::ops::Range;

use crate::domain::TimeWindow;
use crate::timeseries::table::BarTable;

/// Index range of `times` (sorted ascending) that falls inside `window`.
///
/// The lower bound is the first index with `t >= start`; the upper bound is the
/// first index with `t > end`. Equal timestamps stay together on both edges.
#[must_use]
pub fn trim_range(times: &[i64], window: TimeWindow) -> Range<usize> {
    let lo = times.partition_point(|&t| t < window.start);
    let hi = times.partition_point(|&t| t <= window.end);
    lo..hi.max(lo)
}

/// Clip a sorted bar table to `window`.
///
/// `None` (nothing was fetched) short-circuits to [`BarTable::empty`], so
/// downstream numeric code always receives a typed table.
#[must_use]
pub fn trim_window(table: Option<BarTable>, window: TimeWindow) -> BarTable {
    let Some(table) = table else {
        return BarTable::empty();
    };
    let range = trim_range(table.datetime(), window);
    if range.start == 0 && range.end == table.len() {
        return table;
    }
    table.slice(range)
}
