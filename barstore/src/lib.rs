//! Barstore assembles price bars from a shard-document store.
//!
//! Overview
//! - Storage keeps one document per shard (one trading day of one code), each
//!   field a parallel array plus a declared length `_l`.
//! - A request is routed once by frequency: minute bars go to an external
//!   minute source, day bars to a window reader, and hour bars are assembled
//!   from one-minute shards over trading sessions.
//! - Assembly streams shards into an aligned table, pads fields a shard lacks,
//!   sorts by time, and trims to the exact window by ordered search.
//! - The available date range per frequency is resolved lazily and memoized in
//!   a bounded LRU cache.
//!
//! Key behaviors
//! - An empty window is `Ok(BarTable::empty())`, never an error.
//! - Store errors propagate unchanged and are never retried.
//! - A missing minute range is `RangeUnavailable`, which callers should treat
//!   as a provisioning fault.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use barstore::{Barstore, BarRequest, Frequency, Instrument, InstrumentKind};
//!
//! let engine = Barstore::builder()
//!     .store(store.clone())
//!     .window_reader(reader)
//!     .minute_source(minutes)
//!     .build()?;
//!
//! let index = Instrument::new("000001.XSHG", InstrumentKind::Index)?;
//! let bars = engine
//!     .raw_history_bars(&index, BarRequest::new(Frequency::DAILY).length(20))
//!     .await?;
//! let (first, last) = engine.available_data_range(Frequency::MINUTE).await?;
//! ```
//!
//! See the `demos` crate for runnable end-to-end demonstrations.
#![warn(missing_docs)]

mod blocking;
pub(crate) mod core;
mod router;

pub use blocking::BlockingBarstore;
pub use crate::core::{Barstore, BarstoreBuilder};
pub use router::fetch::fetch_bars;
pub use router::plan::FetchPlan;
pub use router::range::DataRange;

pub use barstore_middleware::{CacheMiddleware, CachingBarSource};

// Re-export core types for convenience
pub use barstore_core::{
    BAR_FIELDS, BarRequest, BarSource, BarTable, BarstoreConfig, BarstoreError, CacheConfig,
    Capability, CollectionPair, DATETIME, Document, DocumentStore, DocumentStream, FieldValue,
    FindQuery, Frequency, FrequencyUnit, Instrument, InstrumentKind, MergedTable,
    MinuteBarSource, Namespace, SessionParams, SortDirection, SortSpec, TimeWindow, WindowRead,
    WindowReader,
};
