#![doc = include_str!("../README.md")]
//! barstore-middleware
//!
//! Re-exports for middleware wrappers.

use std::sync::Arc;

use barstore_core::BarSource;

mod builder;
mod cache;

pub use crate::builder::SourceBuilder;
pub use crate::cache::{CacheMiddleware, CachingBarSource};

/// A layer that wraps one bar source in another.
pub trait Middleware: Send + Sync {
    /// Wrap `inner` and return the wrapped source.
    fn apply(self: Box<Self>, inner: Arc<dyn BarSource>) -> Arc<dyn BarSource>;

    /// Layer name for introspection and logging.
    fn name(&self) -> &'static str;

    /// Configuration snapshot for inspection.
    fn config_json(&self) -> serde_json::Value;
}
