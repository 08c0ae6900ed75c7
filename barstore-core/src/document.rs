use core::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::time::{pack_datetime, parse_store_datetime};

/// A raw document as returned by the store.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// A store query filter in the document store's JSON dialect
/// (`{"code": "000001", "datetime": {"$gte": ..., "$lte": ...}}`).
pub type Filter = serde_json::Value;

/// Field carrying the number of bars a shard contributes.
pub const LENGTH_KEY: &str = "_l";

/// Largest `_l` accepted from a store document. A trading day of tick-level
/// bars stays well below it; anything larger is treated as corrupt.
pub const MAX_SHARD_LEN: usize = 1 << 20;

/// One per-bar value inside a shard array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// Numeric value; `NaN` marks a missing number.
    Number(f64),
    /// Textual value (timestamps, codes, tags).
    Text(String),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::nan()
    }
}

impl FieldValue {
    /// The default fill value for numeric fields.
    #[must_use]
    pub const fn nan() -> Self {
        Self::Number(f64::NAN)
    }

    /// Numeric payload, if this is a number.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Interpret this value as a packed `YYYYMMDDHHMMSS` instant.
    ///
    /// Strings are parsed in the store's date-time formats. Finite numbers
    /// are taken as already packed; eight-digit `YYYYMMDD` numbers are widened.
    #[must_use]
    pub fn as_packed_time(&self) -> Option<i64> {
        match self {
            Self::Text(s) => parse_store_datetime(s).map(pack_datetime),
            Self::Number(n) if n.is_finite() => {
                #[allow(clippy::cast_possible_truncation)]
                let v = *n as i64;
                if (10_000_000..100_000_000).contains(&v) {
                    Some(v * 1_000_000)
                } else {
                    Some(v)
                }
            }
            Self::Number(_) => None,
        }
    }

    /// Total order used for time sorting: numbers (by `f64::total_cmp`)
    /// before text (lexicographic).
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&serde_json::Value> for FieldValue {
    fn from(v: &serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Number(n) => n.as_f64().map_or_else(Self::nan, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            Value::Bool(b) => Self::Number(if *b { 1.0 } else { 0.0 }),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::nan(),
        }
    }
}

/// Shard view of a store document: its declared length plus every array field.
///
/// Arrays are kept whatever their length; the merger decides which ones line
/// up with `len`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShardDocument {
    /// Declared number of bars in this shard.
    pub len: usize,
    /// Array-valued fields by name.
    pub fields: BTreeMap<String, Vec<FieldValue>>,
}

impl ShardDocument {
    /// Start an empty shard declaring `len` bars.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            len,
            fields: BTreeMap::new(),
        }
    }

    /// Add an array field.
    #[must_use]
    pub fn with_field<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        self.fields
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Read a store document. Returns `None` when the document carries no
    /// usable length field; scalar fields other than the length are ignored.
    #[must_use]
    pub fn from_document(doc: &Document) -> Option<Self> {
        let len = doc.get(LENGTH_KEY).and_then(declared_len)?;
        let fields = doc
            .iter()
            .filter(|(k, _)| k.as_str() != LENGTH_KEY)
            .filter_map(|(k, v)| {
                v.as_array()
                    .map(|arr| (k.clone(), arr.iter().map(FieldValue::from).collect()))
            })
            .collect();
        Some(Self { len, fields })
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn declared_len(v: &serde_json::Value) -> Option<usize> {
    let len = if let Some(n) = v.as_u64() {
        usize::try_from(n).ok()?
    } else {
        // Some writers store the length as a float (e.g. 240.0).
        let f = v.as_f64()?;
        if !(0.0..=MAX_SHARD_LEN as f64).contains(&f) || f.fract() != 0.0 {
            return None;
        }
        f as usize
    };
    (len <= MAX_SHARD_LEN).then_some(len)
}

/// Database plus collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    /// Database name.
    pub database: String,
    /// Collection name.
    pub collection: String,
}

impl Namespace {
    /// Convenience constructor.
    pub fn new(database: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            collection: collection.into(),
        }
    }
}

/// Sort direction for ordered lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Sort key plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort on.
    pub key: String,
    /// Direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending on `key`.
    pub fn ascending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Ascending,
        }
    }

    /// Descending on `key`.
    pub fn descending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// A cursor query: namespace, filter, and an optional exclusion projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindQuery {
    /// Where to look.
    pub ns: Namespace,
    /// Which documents match.
    pub filter: Filter,
    /// Which fields to return (`{"_id": 0}` excludes `_id`).
    pub projection: Option<serde_json::Value>,
}

impl FindQuery {
    /// Query without a projection.
    #[must_use]
    pub const fn new(ns: Namespace, filter: Filter) -> Self {
        Self {
            ns,
            filter,
            projection: None,
        }
    }

    /// Attach a projection.
    #[must_use]
    pub fn projection(mut self, projection: serde_json::Value) -> Self {
        self.projection = Some(projection);
        self
    }
}
