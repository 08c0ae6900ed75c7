use std::collections::BTreeMap;

use crate::document::{FieldValue, ShardDocument};

/// Field-aligned table assembled from shard documents.
///
/// Every column holds exactly [`MergedTable::len`] values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergedTable {
    len: usize,
    columns: BTreeMap<String, Vec<FieldValue>>,
}

impl MergedTable {
    /// Number of rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// True when the table has no rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[FieldValue]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Column names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Consume the table, yielding its columns.
    #[must_use]
    pub fn into_columns(self) -> BTreeMap<String, Vec<FieldValue>> {
        self.columns
    }

    /// Build a table from equal-length columns. Returns `None` if the column
    /// lengths disagree or there are no columns.
    #[must_use]
    pub fn from_columns(columns: BTreeMap<String, Vec<FieldValue>>) -> Option<Self> {
        let len = columns.values().next()?.len();
        if columns.values().any(|c| c.len() != len) {
            return None;
        }
        Some(Self { len, columns })
    }

    /// Stable sort of every column by the values of `key`.
    ///
    /// Rows with equal keys keep their arrival order. Returns `false` (and
    /// leaves the table untouched) when `key` is not a column.
    pub fn sort_by_field(&mut self, key: &str) -> bool {
        let Some(keys) = self.columns.get(key) else {
            return false;
        };
        let mut order: Vec<usize> = (0..self.len).collect();
        order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));
        self.reorder(&order);
        true
    }

    /// Stable sort of every column by the instant stored under `key`.
    ///
    /// Text in any store format and packed numbers compare on one axis.
    /// Rows whose instant cannot be read go last, in arrival order. Returns
    /// `false` when `key` is not a column.
    pub fn sort_by_time(&mut self, key: &str) -> bool {
        let Some(keys) = self.columns.get(key) else {
            return false;
        };
        let instants: Vec<Option<i64>> = keys.iter().map(FieldValue::as_packed_time).collect();
        let mut order: Vec<usize> = (0..self.len).collect();
        order.sort_by_key(|&i| (instants[i].is_none(), instants[i]));
        self.reorder(&order);
        true
    }

    fn reorder(&mut self, order: &[usize]) {
        if order.iter().enumerate().all(|(pos, &i)| pos == i) {
            return;
        }
        for col in self.columns.values_mut() {
            let reordered: Vec<FieldValue> = order.iter().map(|&i| col[i].clone()).collect();
            *col = reordered;
        }
    }

    /// Keep only the rows for which `keep` returns true, across all columns.
    pub fn retain_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(usize) -> bool,
    {
        let mask: Vec<bool> = (0..self.len).map(&mut keep).collect();
        for col in self.columns.values_mut() {
            let mut i = 0;
            col.retain(|_| {
                let k = mask[i];
                i += 1;
                k
            });
        }
        self.len = mask.iter().filter(|k| **k).count();
    }

    /// Reverse the row order of every column.
    pub fn reverse_rows(&mut self) {
        for col in self.columns.values_mut() {
            col.reverse();
        }
    }
}

/// Incremental shard merger.
///
/// Shards are pushed in store iteration order. After each shard every column
/// is padded with the fill value up to the running total, so a field that a
/// shard omits (or carries with the wrong length) holds the fill value at
/// exactly that shard's positions.
#[derive(Debug, Clone)]
pub struct FieldMerger {
    fill: FieldValue,
    total: usize,
    shards: usize,
    columns: BTreeMap<String, Vec<FieldValue>>,
}

impl Default for FieldMerger {
    fn default() -> Self {
        Self::new(FieldValue::nan())
    }
}

impl FieldMerger {
    /// Start an empty merge padding with `fill`.
    #[must_use]
    pub const fn new(fill: FieldValue) -> Self {
        Self {
            fill,
            total: 0,
            shards: 0,
            columns: BTreeMap::new(),
        }
    }

    /// Rows accumulated so far.
    #[must_use]
    pub const fn total_len(&self) -> usize {
        self.total
    }

    /// Shards pushed so far.
    #[must_use]
    pub const fn shard_count(&self) -> usize {
        self.shards
    }

    /// Append one shard.
    ///
    /// A shard that would push the row count past `usize::MAX` is skipped.
    pub fn push(&mut self, shard: ShardDocument) {
        let offset = self.total;
        let l = shard.len;
        let Some(total) = offset.checked_add(l) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                target = "barstore::merge",
                declared = l,
                total = offset,
                "row count overflow; skipping shard"
            );
            return;
        };
        self.total = total;
        self.shards += 1;

        let fill = &self.fill;
        for (name, values) in shard.fields {
            if values.len() != l {
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    target = "barstore::merge",
                    field = %name,
                    declared = l,
                    actual = values.len(),
                    "field length mismatch; padding shard"
                );
                continue;
            }
            // A field first seen here holds the fill value for every earlier shard.
            let col = self
                .columns
                .entry(name)
                .or_insert_with(|| vec![fill.clone(); offset]);
            col.extend(values);
        }

        for col in self.columns.values_mut() {
            if col.len() < self.total {
                col.resize(self.total, fill.clone());
            }
        }
    }

    /// Finish the merge. Returns `None` when nothing was assembled (no
    /// columns or no rows), the explicit "no data" marker.
    #[must_use]
    pub fn finish(self) -> Option<MergedTable> {
        if self.total == 0 || self.columns.is_empty() {
            return None;
        }
        Some(MergedTable {
            len: self.total,
            columns: self.columns,
        })
    }
}

/// Merge a sequence of shards in one go. See [`FieldMerger`].
///
/// The result is not yet time-sorted; call [`MergedTable::sort_by_time`].
#[must_use]
pub fn merge_shards<I>(shards: I, fill: FieldValue) -> Option<MergedTable>
where
    I: IntoIterator<Item = ShardDocument>,
{
    let mut merger = FieldMerger::new(fill);
    for shard in shards {
        merger.push(shard);
    }
    merger.finish()
}
