use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for errors and telemetry.
///
/// These map one-to-one with the public operations of a bar source and give
/// timeouts and unsupported-input errors a stable label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Daily bars read through the window reader.
    DayBars,
    /// Minute bars served by the external minute source.
    MinuteBars,
    /// Intraday bars assembled from minute shards for other frequencies.
    SessionBars,
    /// Available data range lookup.
    DataRange,
}

impl Capability {
    /// Stable string label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DayBars => "day-bars",
            Self::MinuteBars => "minute-bars",
            Self::SessionBars => "session-bars",
            Self::DataRange => "data-range",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Capability> for String {
    fn from(c: Capability) -> Self {
        c.as_str().to_string()
    }
}
