use std::sync::Arc;

use barstore_core::{
    BarRequest, BarTable, BarstoreError, Frequency, Instrument, SessionParams,
};
use tokio::runtime::{Builder, Runtime};

use crate::{Barstore, DataRange};

/// Synchronous façade over a shared [`Barstore`].
///
/// Each call drives the async engine to completion on a private
/// current-thread runtime. Call it from plain threads only: blocking inside
/// an async task panics.
pub struct BlockingBarstore {
    engine: Arc<Barstore>,
    runtime: Runtime,
}

impl BlockingBarstore {
    /// Wrap `engine`.
    ///
    /// # Errors
    /// Returns `Other` if the runtime cannot be started.
    pub fn new(engine: Arc<Barstore>) -> Result<Self, BarstoreError> {
        let runtime = Builder::new_current_thread()
            .enable_time()
            .build()
            .map_err(|e| BarstoreError::Other(format!("failed to start runtime: {e}")))?;
        Ok(Self { engine, runtime })
    }

    /// The wrapped engine.
    #[must_use]
    pub const fn engine(&self) -> &Arc<Barstore> {
        &self.engine
    }

    /// Blocking [`Barstore::raw_history_bars`].
    ///
    /// # Errors
    /// As the async call.
    pub fn raw_history_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        self.runtime
            .block_on(self.engine.raw_history_bars(instrument, req))
    }

    /// Blocking [`Barstore::bars_in_sessions`].
    ///
    /// # Errors
    /// As the async call.
    pub fn bars_in_sessions(
        &self,
        instrument: &Instrument,
        sessions: &[SessionParams],
    ) -> Result<BarTable, BarstoreError> {
        self.runtime
            .block_on(self.engine.bars_in_sessions(instrument, sessions))
    }

    /// Blocking [`Barstore::available_data_range`].
    ///
    /// # Errors
    /// As the async call.
    pub fn available_data_range(&self, frequency: Frequency) -> Result<DataRange, BarstoreError> {
        self.runtime
            .block_on(self.engine.available_data_range(frequency))
    }
}
