use std::sync::Arc;

use barstore::{BlockingBarstore, Frequency};
use barstore_demos::common::{engine_over, sample_store};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let store = sample_store();
    let engine = Arc::new(engine_over(store.clone())?);
    let sync = BlockingBarstore::new(engine)?;

    for tag in ["1d", "1h", "1m", "1m", "5m"] {
        let freq: Frequency = tag.parse()?;
        let (first, last) = sync.available_data_range(freq)?;
        println!(
            "{tag:>3}: {first} .. {last} (store probes so far: {})",
            store.find_sorted_calls()
        );
    }
    Ok(())
}
