//! Builder for composing bar sources with middleware layers.
//!
//! Layers form an onion around the raw source. They are stored
//! outermost-first (the last one added is the outermost) and applied in
//! reverse during `build()`:
//!
//! ```text
//! builder.with_cache(..)
//!
//! Storage: [Cache]
//! Result:  Cache(Raw)
//! ```

use std::sync::Arc;

use barstore_core::BarSource;
use barstore_types::CacheConfig;

use crate::Middleware;
use crate::cache::CacheMiddleware;

const CACHE_LAYER: &str = "CachingBarSource";

/// Generic middleware builder for composing a bar source with wrappers.
pub struct SourceBuilder {
    raw: Arc<dyn BarSource>,
    layers: Vec<Box<dyn Middleware>>,
}

impl SourceBuilder {
    /// Start from a raw, unwrapped source.
    #[must_use]
    pub fn new(raw: Arc<dyn BarSource>) -> Self {
        Self {
            raw,
            layers: Vec::new(),
        }
    }

    /// Add or replace the read-through cache as the outermost layer.
    #[must_use]
    pub fn with_cache(mut self, cfg: &CacheConfig) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self.layers
            .insert(0, Box::new(CacheMiddleware::new(cfg.clone())));
        self
    }

    /// Remove the cache layer if present.
    #[must_use]
    pub fn without_cache(mut self) -> Self {
        self.layers.retain(|m| m.name() != CACHE_LAYER);
        self
    }

    /// Names of the configured layers, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|m| m.name()).collect()
    }

    /// Apply every layer, innermost first.
    #[must_use]
    pub fn build(self) -> Arc<dyn BarSource> {
        let mut wrapped = self.raw;
        for layer in self.layers.into_iter().rev() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target = "barstore::middleware",
                layer = layer.name(),
                config = %layer.config_json(),
                "applying middleware"
            );
            wrapped = layer.apply(wrapped);
        }
        wrapped
    }
}
