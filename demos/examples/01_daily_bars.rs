use barstore::{BarRequest, Frequency, Instrument, InstrumentKind};
use barstore_demos::common::{engine, render};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = engine()?;
    let index = Instrument::new("000001.XSHG", InstrumentKind::Index)?;
    let stock = Instrument::new("600000.XSHG", InstrumentKind::Equity)?;

    let bars = engine
        .raw_history_bars(&index, BarRequest::new(Frequency::DAILY))
        .await?;
    println!("{} daily bars:\n{}", index.order_book_id(), render(&bars));

    let start = NaiveDate::from_ymd_opt(2020, 1, 3)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or("bad start")?;
    let req = BarRequest::new(Frequency::DAILY).start(start).length(2);
    let bars = engine.raw_history_bars(&stock, req).await?;
    println!("{} from {start}, two bars:\n{}", stock.order_book_id(), render(&bars));

    Ok(())
}
