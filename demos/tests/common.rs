use barstore::{BarRequest, Frequency, Instrument, InstrumentKind};
use barstore_demos::common::{engine, render};

#[tokio::test]
async fn demo_engine_serves_every_path() {
    let engine = engine().unwrap();
    let stock = Instrument::new("600000.XSHG", InstrumentKind::Equity).unwrap();

    let minute = engine
        .raw_history_bars(&stock, BarRequest::new(Frequency::MINUTE))
        .await
        .unwrap();
    assert_eq!(minute.len(), 4);

    let daily = engine
        .raw_history_bars(&stock, BarRequest::new(Frequency::DAILY))
        .await
        .unwrap();
    let text = render(&daily);
    assert_eq!(text.lines().count(), 1 + daily.len());
    assert!(text.starts_with("datetime"));
}
