use std::sync::Arc;
use std::time::Duration;

use barstore::{BarRequest, BarSource, CacheConfig, Frequency, Instrument, InstrumentKind};
use barstore_demos::common::{engine_over, sample_store};
use barstore_middleware::SourceBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = sample_store();
    let engine: Arc<dyn BarSource> = Arc::new(engine_over(store.clone())?);
    let cfg = CacheConfig {
        max_entries: 64,
        ttl: Some(Duration::from_secs(30)),
    };
    let source = SourceBuilder::new(engine).with_cache(&cfg).build();

    let index = Instrument::new("000001.XSHG", InstrumentKind::Index)?;
    let req = BarRequest::new(Frequency::DAILY);
    for _ in 0..3 {
        let bars = source.raw_history_bars(&index, req).await?;
        println!("{} bars, store cursors opened: {}", bars.len(), store.find_calls());
    }
    Ok(())
}
