use barstore::{BarRequest, Frequency, Instrument, InstrumentKind, SessionParams};
use barstore_demos::common::engine;
use chrono::NaiveDate;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,barstore=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let engine = engine()?;
    let stock = Instrument::new("600000.XSHG", InstrumentKind::Equity)?;

    // Day path
    let _ = engine
        .raw_history_bars(&stock, BarRequest::new(Frequency::DAILY))
        .await?;

    // Session path (logs the dropped text columns and padded fields)
    let date = NaiveDate::from_ymd_opt(2020, 1, 3).ok_or("bad date")?;
    let _ = engine
        .bars_in_sessions(&stock, &[SessionParams::day(date)])
        .await?;

    // Minute range probe, then a memoized hit
    let _ = engine.available_data_range(Frequency::MINUTE).await?;
    let _ = engine.available_data_range(Frequency::MINUTE).await?;

    Ok(())
}
