use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the barstore workspace.
///
/// Local, recoverable conditions (an empty window, a field missing from a shard)
/// never surface here; they resolve to empty or padded tables. Every variant
/// describes a request that could not be answered at all.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BarstoreError {
    /// The requested capability is not available for the given input
    /// (e.g. an instrument kind without a collection mapping).
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "bars/fund").
        capability: String,
    },

    /// Issues with the stored data that prevent any answer.
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// The document store rejected or failed a query.
    #[error("{store} failed: {msg}")]
    Store {
        /// Store name that failed.
        store: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The store holds no record that bounds the available history for a
    /// frequency. This means the store is not provisioned for it.
    #[error("no available data range for frequency {frequency}")]
    RangeUnavailable {
        /// Frequency tag that could not be resolved (e.g. "1m").
        frequency: String,
    },

    /// The configured query timeout elapsed before the store answered.
    #[error("request timed out: {capability}")]
    RequestTimeout {
        /// Capability label for which the request timed out.
        capability: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl BarstoreError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub fn unsupported(cap: impl Into<String>) -> Self {
        Self::Unsupported {
            capability: cap.into(),
        }
    }

    /// Helper: build a `Store` error with the store name and message.
    pub fn store(store: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Store {
            store: store.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `RangeUnavailable` error for a frequency tag.
    pub fn range_unavailable(frequency: impl Into<String>) -> Self {
        Self::RangeUnavailable {
            frequency: frequency.into(),
        }
    }

    /// Helper: build a `RequestTimeout` error.
    #[must_use]
    pub fn request_timeout(capability: impl Into<String>) -> Self {
        Self::RequestTimeout {
            capability: capability.into(),
        }
    }

    /// Returns true if this error points at a broken or misconfigured store
    /// rather than at the caller's input.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Store { .. } | Self::RangeUnavailable { .. } | Self::RequestTimeout { .. }
        )
    }
}
