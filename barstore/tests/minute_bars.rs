mod helpers;

use barstore::{BarRequest, BarTable, BarstoreError, Frequency, Instrument, InstrumentKind};
use barstore_mock::{MinuteCall, MockMinuteSource, fixtures};
use helpers::*;

fn source() -> MockMinuteSource {
    MockMinuteSource::new().with_table(
        stock().order_book_id(),
        fixtures::minute_bars("2020-01-02", &SESSION_TIMES, 10.0),
    )
}

#[tokio::test]
async fn minute_requests_pass_through_unchanged() {
    let h = harness_with(fixtures::sample_store(), source());
    let req = BarRequest::new(Frequency::MINUTE)
        .start(at(2020, 1, 2, 9, 32, 0))
        .length(2);
    let bars = h.engine.raw_history_bars(&stock(), req).await.unwrap();
    assert_eq!(bars.datetime(), &[20_200_102_145_900, 20_200_102_150_000]);

    assert_eq!(
        h.minutes.calls(),
        vec![MinuteCall {
            order_book_id: "600000.XSHG".into(),
            frequency: Frequency::MINUTE,
            start: Some(at(2020, 1, 2, 9, 32, 0)),
            end: None,
            length: Some(2),
        }]
    );
    assert_eq!(h.store.find_calls(), 0);
    assert_eq!(h.reader.reads(), 0);
}

#[tokio::test]
async fn every_minute_multiple_uses_the_minute_path() {
    let h = harness_with(fixtures::sample_store(), source());
    let five: Frequency = "5m".parse().unwrap();
    h.engine
        .raw_history_bars(&stock(), BarRequest::new(five))
        .await
        .unwrap();
    let calls = h.minutes.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].frequency, five);
}

#[tokio::test]
async fn minute_path_does_not_check_the_instrument_kind() {
    let h = harness_with(fixtures::sample_store(), source());
    let fund = Instrument::new("510300.XSHG", InstrumentKind::Fund).unwrap();
    let bars = h
        .engine
        .raw_history_bars(&fund, BarRequest::new(Frequency::MINUTE))
        .await
        .unwrap();
    assert_eq!(bars, BarTable::empty());
    assert_eq!(h.minutes.calls().len(), 1);
}

#[tokio::test]
async fn minute_source_errors_propagate() {
    let h = harness_with(fixtures::sample_store(), source());
    h.minutes.set_failing(true);
    let err = h
        .engine
        .raw_history_bars(&stock(), BarRequest::new(Frequency::MINUTE))
        .await
        .unwrap_err();
    assert!(matches!(err, BarstoreError::Store { .. }));
}
