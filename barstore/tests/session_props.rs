mod helpers;

use barstore::SessionParams;
use barstore_core::time::pack_date;
use chrono::NaiveDate;
use helpers::*;
use proptest::prelude::*;

/// Start-of-session and end-of-session candidates: on, between, and around
/// the fixture bar times.
const TIMES: [i64; 8] = [0, 93_100, 93_130, 93_200, 120_000, 145_900, 150_000, 235_959];
const BAR_TIMES: [i64; 4] = [93_100, 93_200, 145_900, 150_000];

fn trade_day(offset: u32) -> NaiveDate {
    day(2020, 1, 1 + offset)
}

/// Every stored `600000` one-minute instant inside `[lo, hi]`.
fn expected(lo: i64, hi: i64) -> Vec<i64> {
    [day(2020, 1, 2), day(2020, 1, 3)]
        .iter()
        .flat_map(|d| BAR_TIMES.iter().map(move |t| pack_date(*d) + t))
        .filter(|ts| lo <= *ts && *ts <= hi)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn session_window_returns_exactly_the_stored_bars_inside_it(
        first in 0u32..4,
        span in 0u32..3,
        start_idx in 0usize..TIMES.len(),
        end_idx in 0usize..TIMES.len(),
    ) {
        let start_day = trade_day(first);
        let end_day = trade_day(first + span);
        let (start, end) = (TIMES[start_idx], TIMES[end_idx]);
        let sessions = [
            SessionParams::day(start_day).starting_at(start),
            SessionParams::day(end_day).ending_at(end),
        ];

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let h = harness();
        let bars = rt
            .block_on(h.engine.bars_in_sessions(&stock(), &sessions))
            .unwrap();

        let want = expected(pack_date(start_day) + start, pack_date(end_day) + end);
        prop_assert_eq!(bars.datetime(), want.as_slice());
        prop_assert!(bars.datetime().windows(2).all(|w| w[0] <= w[1]));
    }
}
