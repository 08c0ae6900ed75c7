use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use barstore_core::{
    BarstoreError, Document, DocumentStore, DocumentStream, Filter, FindQuery, Namespace,
    SortSpec,
};
use futures::StreamExt;
use futures::stream;

pub mod fixtures;
mod minute;
mod query;
mod reader;

pub use minute::{MinuteCall, MockMinuteSource};
pub use reader::MemoryWindowReader;

const STORE_NAME: &str = "barstore-mock";
const NO_CURSOR_FAILURE: usize = usize::MAX;

/// In-memory document store for CI-safe tests and demos.
///
/// Documents live per namespace in insertion order, which is the order
/// cursors yield them. Call counters, a failure switch, and an artificial
/// latency let tests observe memoization, error propagation, and timeouts.
pub struct MemoryStore {
    collections: HashMap<Namespace, Vec<Document>>,
    find_calls: AtomicUsize,
    find_sorted_calls: AtomicUsize,
    failing: AtomicBool,
    cursor_fails_after: AtomicUsize,
    latency_ms: AtomicU64,
    queries: Mutex<Vec<FindQuery>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            collections: HashMap::new(),
            find_calls: AtomicUsize::new(0),
            find_sorted_calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
            cursor_fails_after: AtomicUsize::new(NO_CURSOR_FAILURE),
            latency_ms: AtomicU64::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Add documents to a namespace, keeping their order.
    #[must_use]
    pub fn with_documents<I>(mut self, ns: &Namespace, docs: I) -> Self
    where
        I: IntoIterator<Item = Document>,
    {
        self.insert_many(ns, docs);
        self
    }

    /// Append one document to a namespace.
    pub fn insert(&mut self, ns: &Namespace, doc: Document) {
        self.collections.entry(ns.clone()).or_default().push(doc);
    }

    /// Append documents to a namespace.
    pub fn insert_many<I>(&mut self, ns: &Namespace, docs: I)
    where
        I: IntoIterator<Item = Document>,
    {
        self.collections.entry(ns.clone()).or_default().extend(docs);
    }

    /// Documents stored under `ns`.
    #[must_use]
    pub fn documents(&self, ns: &Namespace) -> &[Document] {
        self.collections.get(ns).map_or(&[][..], Vec::as_slice)
    }

    /// Number of `find` calls so far.
    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Number of `find_sorted` calls so far.
    pub fn find_sorted_calls(&self) -> usize {
        self.find_sorted_calls.load(Ordering::SeqCst)
    }

    /// Every query passed to `find`, oldest first.
    pub fn recorded_queries(&self) -> Vec<FindQuery> {
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every subsequent call fail with a store error.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make cursors yield a store error after `n` documents. `None` disables.
    pub fn set_cursor_failure(&self, after: Option<usize>) {
        self.cursor_fails_after
            .store(after.unwrap_or(NO_CURSOR_FAILURE), Ordering::SeqCst);
    }

    /// Delay every call by `latency` before answering.
    pub fn set_latency(&self, latency: Duration) {
        let ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self.latency_ms.store(ms, Ordering::SeqCst);
    }

    async fn before_call(&self, op: &str) -> Result<(), BarstoreError> {
        let ms = self.latency_ms.load(Ordering::SeqCst);
        if ms > 0 {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(BarstoreError::store(
                STORE_NAME,
                format!("forced failure: {op}"),
            ));
        }
        Ok(())
    }

    fn select(&self, ns: &Namespace, filter: &Filter) -> Vec<Document> {
        self.documents(ns)
            .iter()
            .filter(|d| query::matches(d, filter))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn name(&self) -> &'static str {
        STORE_NAME
    }

    async fn find(&self, req: FindQuery) -> Result<DocumentStream, BarstoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call("find").await?;
        self.queries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(req.clone());

        let fail_after = self.cursor_fails_after.load(Ordering::SeqCst);
        let mut items: Vec<Result<Document, BarstoreError>> = self
            .select(&req.ns, &req.filter)
            .iter()
            .map(|d| Ok(query::project(d, req.projection.as_ref())))
            .collect();
        if fail_after != NO_CURSOR_FAILURE {
            items.truncate(fail_after);
            items.push(Err(BarstoreError::store(
                STORE_NAME,
                "cursor interrupted",
            )));
        }
        Ok(stream::iter(items).boxed())
    }

    async fn find_sorted(
        &self,
        ns: &Namespace,
        filter: &Filter,
        sort: &SortSpec,
        limit: usize,
    ) -> Result<Vec<Document>, BarstoreError> {
        self.find_sorted_calls.fetch_add(1, Ordering::SeqCst);
        self.before_call("find_sorted").await?;
        let mut docs = self.select(ns, filter);
        query::sort_documents(&mut docs, sort);
        docs.truncate(limit);
        Ok(docs)
    }
}
