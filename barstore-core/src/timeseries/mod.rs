//! Time-series utilities for shard assembly.
//!
//! Modules include:
//! - `merge`: stitch shard documents into one field-aligned table
//! - `table`: fixed-width columnar bar table and conversion from merged shards
//! - `trim`: clip a sorted bar table to an inclusive window
/// Shard merging with per-shard padding.
pub mod merge;
/// Columnar bar table.
pub mod table;
/// Window trimming by binary search.
pub mod trim;
