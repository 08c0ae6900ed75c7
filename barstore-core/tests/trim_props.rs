use std::collections::BTreeMap;

use barstore_core::{BarTable, TimeWindow, trim_range, trim_window};
use proptest::prelude::*;

fn table(times: Vec<i64>) -> BarTable {
    let close: Vec<f64> = times.iter().map(|&t| t as f64).collect();
    let mut cols = BTreeMap::new();
    cols.insert("close".to_string(), close);
    BarTable::new(times, cols).unwrap()
}

#[test]
fn keeps_duplicates_on_both_edges() {
    let t = table(vec![10, 20, 20, 30, 40]);
    let out = trim_window(Some(t), TimeWindow::new(20, 30));
    assert_eq!(out.datetime(), &[20, 20, 30]);
    assert_eq!(out.column("close").unwrap(), &[20.0, 20.0, 30.0]);
}

#[test]
fn no_data_marker_becomes_typed_empty_table() {
    let out = trim_window(None, TimeWindow::new(0, i64::MAX));
    assert_eq!(out, BarTable::empty());
    // Trimming the typed empty table again changes nothing.
    assert_eq!(trim_window(Some(out.clone()), TimeWindow::new(0, 1)), out);
}

#[test]
fn window_between_bars_is_empty_but_keeps_columns() {
    let out = trim_window(Some(table(vec![10, 20])), TimeWindow::new(11, 19));
    assert!(out.is_empty());
    assert_eq!(out.column("close"), Some(&[][..]));
}

proptest! {
    #[test]
    fn trim_keeps_exactly_the_in_window_rows(
        mut times in proptest::collection::vec(0i64..100, 0..40),
        a in 0i64..100,
        b in 0i64..100,
    ) {
        times.sort_unstable();
        let (start, end) = (a.min(b), a.max(b));
        let window = TimeWindow::new(start, end);

        let range = trim_range(&times, window);
        let expected: Vec<i64> = times.iter().copied().filter(|t| window.contains(*t)).collect();
        prop_assert_eq!(&times[range], expected.as_slice());

        let out = trim_window(Some(table(times.clone())), window);
        prop_assert_eq!(out.datetime(), expected.as_slice());
        prop_assert_eq!(out.column("close").unwrap().len(), expected.len());
    }
}
