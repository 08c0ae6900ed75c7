use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use barstore_core::document::LENGTH_KEY;
use barstore_core::time::pack_date;
use barstore_core::{
    BarstoreError, Document, DocumentStore, FieldMerger, FieldValue, FindQuery, MergedTable,
    ShardDocument, SortDirection, WindowRead, WindowReader,
};
use futures::StreamExt;
use serde_json::json;

/// Packed `HHMMSS` of the last second of a day.
const END_OF_DAY: i64 = 235_959;

/// Window reader backed by a [`crate::MemoryStore`].
///
/// Accepts both row documents (one bar of scalars) and shard documents
/// (parallel arrays plus `_l`). Bounds and length resolve as the production
/// reader does:
/// - both dates: every row inside the window;
/// - an end date (or none) with a length: the last `length` rows up to it;
/// - a start date with a length: the first `length` rows from it.
pub struct MemoryWindowReader {
    store: Arc<crate::MemoryStore>,
    reads: AtomicUsize,
}

impl MemoryWindowReader {
    /// Reader over `store`.
    #[must_use]
    pub const fn new(store: Arc<crate::MemoryStore>) -> Self {
        Self {
            store,
            reads: AtomicUsize::new(0),
        }
    }

    /// Number of reads served so far.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

fn shard_of(doc: &Document) -> Option<ShardDocument> {
    if doc.contains_key(LENGTH_KEY) {
        return ShardDocument::from_document(doc);
    }
    let mut row = ShardDocument::new(1);
    for (k, v) in doc.iter().filter(|(_, v)| !v.is_array()) {
        row.fields.insert(k.clone(), vec![FieldValue::from(v)]);
    }
    Some(row)
}

fn bound_rows(table: &mut MergedTable, req: &WindowRead) {
    let lo = req.start.map_or(i64::MIN, pack_date);
    let hi = req.end.map_or(i64::MAX, |d| pack_date(d) + END_OF_DAY);
    let times: Vec<Option<i64>> = table
        .column(&req.index)
        .map(|c| c.iter().map(FieldValue::as_packed_time).collect())
        .unwrap_or_default();
    table.retain_rows(|i| times[i].is_some_and(|t| lo <= t && t <= hi));

    let len = table.len();
    match (req.start, req.end, req.length) {
        (Some(_), Some(_), _) | (_, _, None) => {}
        (Some(_), None, Some(n)) => table.retain_rows(|i| i < n),
        (None, _, Some(n)) => {
            let skip = len.saturating_sub(n);
            table.retain_rows(|i| i >= skip);
        }
    }
}

#[async_trait]
impl WindowReader for MemoryWindowReader {
    async fn read(&self, req: WindowRead) -> Result<Option<MergedTable>, BarstoreError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let query = FindQuery::new(req.ns.clone(), json!({ "code": req.code }));
        let mut cursor = self.store.find(query).await?;

        let mut merger = FieldMerger::default();
        while let Some(doc) = cursor.next().await {
            if let Some(shard) = shard_of(&doc?) {
                merger.push(shard);
            }
        }
        let Some(mut table) = merger.finish() else {
            return Ok(None);
        };
        if !table.sort_by_time(&req.index) {
            return Err(BarstoreError::Data(format!(
                "rows in {} carry no {} field",
                req.ns.collection, req.index
            )));
        }
        bound_rows(&mut table, &req);

        if req.sort.key != req.index {
            table.sort_by_field(&req.sort.key);
        }
        if req.sort.direction == SortDirection::Descending {
            table.reverse_rows();
        }
        Ok((!table.is_empty()).then_some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use barstore_core::{Namespace, SortSpec};
    use chrono::NaiveDate;

    fn ns() -> Namespace {
        Namespace::new("quantaxis", "stock_day")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, d).unwrap()
    }

    fn reader() -> MemoryWindowReader {
        let rows = [6, 2, 3, 7, 8].map(|d| {
            json!({"code": "600000", "date": format!("2020-01-{d:02}"), "close": f64::from(d)})
                .as_object()
                .cloned()
                .unwrap_or_default()
        });
        MemoryWindowReader::new(Arc::new(MemoryStore::new().with_documents(&ns(), rows)))
    }

    fn req(start: Option<u32>, end: Option<u32>, length: Option<usize>) -> WindowRead {
        WindowRead {
            ns: ns(),
            code: "600000".into(),
            index: "date".into(),
            start: start.map(day),
            end: end.map(day),
            length,
            sort: SortSpec::ascending("date"),
        }
    }

    fn closes(t: &MergedTable) -> Vec<f64> {
        t.column("close")
            .unwrap()
            .iter()
            .map(|v| v.as_f64().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn resolves_bounds_and_length() {
        let r = reader();
        let t = r.read(req(Some(3), Some(7), Some(1))).await.unwrap().unwrap();
        assert_eq!(closes(&t), vec![3.0, 6.0, 7.0]);

        let t = r.read(req(None, Some(7), Some(2))).await.unwrap().unwrap();
        assert_eq!(closes(&t), vec![6.0, 7.0]);

        let t = r.read(req(Some(3), None, Some(2))).await.unwrap().unwrap();
        assert_eq!(closes(&t), vec![3.0, 6.0]);

        let t = r.read(req(None, None, Some(2))).await.unwrap().unwrap();
        assert_eq!(closes(&t), vec![7.0, 8.0]);

        assert!(r.read(req(Some(9), None, None)).await.unwrap().is_none());
        assert_eq!(r.reads(), 5);
    }

    #[tokio::test]
    async fn descending_sort_reverses_rows() {
        let mut q = req(None, None, None);
        q.sort = SortSpec::descending("date");
        let t = reader().read(q).await.unwrap().unwrap();
        assert_eq!(closes(&t), vec![8.0, 7.0, 6.0, 3.0, 2.0]);
    }
}
