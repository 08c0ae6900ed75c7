use barstore::{BarRequest, Frequency, Instrument, InstrumentKind, SessionParams};
use barstore_demos::common::{engine, render};
use chrono::NaiveDate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let engine = engine()?;
    let stock = Instrument::new("600000.XSHG", InstrumentKind::Equity)?;
    let d2 = NaiveDate::from_ymd_opt(2020, 1, 2).ok_or("bad date")?;
    let d3 = NaiveDate::from_ymd_opt(2020, 1, 3).ok_or("bad date")?;

    // Afternoon of the 2nd through the morning of the 3rd.
    let sessions = [
        SessionParams::day(d2).starting_at(140_000),
        SessionParams::day(d3).ending_at(113_000),
    ];
    let bars = engine.bars_in_sessions(&stock, &sessions).await?;
    println!("session bars (NaN marks padded fields):\n{}", render(&bars));

    // The same window through the hour path, keeping the last two bars.
    let req = BarRequest::new(Frequency::HOURLY)
        .start(d2.and_hms_opt(14, 0, 0).ok_or("bad time")?)
        .end(d3.and_hms_opt(11, 30, 0).ok_or("bad time")?)
        .length(2);
    let bars = engine.raw_history_bars(&stock, req).await?;
    println!("hour path, last two:\n{}", render(&bars));

    Ok(())
}
