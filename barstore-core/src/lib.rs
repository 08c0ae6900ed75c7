//! barstore-core
//!
//! Core types, traits, and utilities shared across the barstore workspace.
//!
//! - `domain`: instruments, frequencies, session blocks, and time windows.
//! - `document`: raw store documents and their shard view.
//! - `connector`: the store, reader, and bar-source traits the engine talks to.
//! - `timeseries`: shard merging, columnar conversion, and window trimming.
//!
//! Nothing in this crate performs I/O. The only suspension points live behind
//! the async traits in `connector`; merging, conversion, and trimming are pure
//! synchronous transformations over already-fetched data.
#![warn(missing_docs)]

/// Store-facing and caller-facing traits.
pub mod connector;
/// Raw store documents and shard views.
pub mod document;
/// Instruments, frequencies, and time windows.
pub mod domain;
/// Packed date/time helpers.
pub mod time;
/// Time-series utilities for merging, converting, and trimming shards.
pub mod timeseries;
pub mod types;

pub use connector::{
    BarSource, DocumentStore, DocumentStream, MinuteBarSource, WindowRead, WindowReader,
};
pub use document::{
    Document, FieldValue, Filter, FindQuery, Namespace, ShardDocument, SortDirection, SortSpec,
};
pub use domain::{
    BarRequest, Frequency, FrequencyUnit, Instrument, InstrumentKind, SessionParams, TimeWindow,
};
pub use timeseries::merge::{FieldMerger, MergedTable, merge_shards};
pub use timeseries::table::{BAR_FIELDS, BarTable, DATETIME};
pub use timeseries::trim::{trim_range, trim_window};
pub use types::*;
