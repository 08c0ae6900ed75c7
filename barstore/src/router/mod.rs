pub mod fetch;
pub mod plan;
pub mod range;
pub mod session;

use async_trait::async_trait;
use barstore_core::{BarRequest, BarSource, BarTable, BarstoreError, Frequency, Instrument};
use chrono::NaiveDate;

use crate::Barstore;

#[async_trait]
impl BarSource for Barstore {
    fn name(&self) -> &'static str {
        "barstore"
    }

    async fn raw_history_bars(
        &self,
        instrument: &Instrument,
        req: BarRequest,
    ) -> Result<BarTable, BarstoreError> {
        Self::raw_history_bars(self, instrument, req).await
    }

    async fn available_data_range(
        &self,
        frequency: Frequency,
    ) -> Result<(NaiveDate, NaiveDate), BarstoreError> {
        Self::available_data_range(self, frequency).await
    }
}
