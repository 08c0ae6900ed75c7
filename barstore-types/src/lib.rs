//! Barstore-specific error, capability, and configuration primitives.
#![warn(missing_docs)]

mod capability;
mod config;
mod error;

pub use capability::Capability;
pub use config::{BarstoreConfig, CacheConfig, CollectionPair};
pub use error::BarstoreError;
