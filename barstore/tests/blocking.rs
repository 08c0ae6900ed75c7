mod helpers;

use std::sync::Arc;

use barstore::{BarRequest, BlockingBarstore, Frequency, SessionParams};
use helpers::*;

#[test]
fn blocking_facade_drives_the_engine() {
    let h = harness();
    let engine = Arc::new(h.engine);
    let sync = BlockingBarstore::new(engine.clone()).unwrap();
    assert!(Arc::ptr_eq(sync.engine(), &engine));

    let bars = sync
        .raw_history_bars(&index(), BarRequest::new(Frequency::DAILY))
        .unwrap();
    assert_eq!(bars.len(), 2);

    let sessions = [SessionParams::day(day(2020, 1, 2)).starting_at(145_900)];
    let bars = sync.bars_in_sessions(&stock(), &sessions).unwrap();
    assert_eq!(bars.datetime(), &[20_200_102_145_900, 20_200_102_150_000]);

    let range = sync.available_data_range(Frequency::MINUTE).unwrap();
    assert_eq!(range, (day(2020, 1, 2), day(2020, 1, 3)));
    assert_eq!(h.store.find_sorted_calls(), 2);
}
