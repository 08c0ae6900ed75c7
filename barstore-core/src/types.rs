//! Re-export of shared types from `barstore-types`.
// Consolidated re-exports so downstream crates can depend on `barstore-core` only
pub use barstore_types::{BarstoreConfig, BarstoreError, CacheConfig, Capability, CollectionPair};
