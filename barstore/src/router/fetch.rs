use barstore_core::{
    BarstoreError, DATETIME, DocumentStore, FieldMerger, FieldValue, FindQuery, MergedTable,
    ShardDocument,
};
use futures::StreamExt;

/// Stream every shard matching `query` into one aligned table sorted by
/// `datetime`.
///
/// Documents are merged in cursor order as they arrive; fields a shard lacks
/// (or carries with the wrong length) are padded with `fill`. Documents with
/// no usable `_l` contribute nothing. Returns `Ok(None)` when nothing was
/// assembled.
///
/// # Errors
/// Store failures, whether opening the cursor or mid-stream, propagate
/// unchanged.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "barstore::router::fetch_bars",
        skip(store, query, fill),
        fields(
            store = store.name(),
            collection = %query.ns.collection,
        ),
    )
)]
pub async fn fetch_bars(
    store: &dyn DocumentStore,
    query: FindQuery,
    fill: FieldValue,
) -> Result<Option<MergedTable>, BarstoreError> {
    let mut cursor = store.find(query).await?;
    let mut merger = FieldMerger::new(fill);
    while let Some(doc) = cursor.next().await {
        let doc = doc?;
        match ShardDocument::from_document(&doc) {
            Some(shard) => merger.push(shard),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    target = "barstore::fetch",
                    store = store.name(),
                    "skipping document without a usable _l length"
                );
            }
        }
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        target = "barstore::fetch",
        shards = merger.shard_count(),
        rows = merger.total_len(),
        "cursor exhausted"
    );

    let Some(mut table) = merger.finish() else {
        return Ok(None);
    };
    if !table.sort_by_time(DATETIME) {
        #[cfg(feature = "tracing")]
        tracing::debug!(target = "barstore::fetch", "merged shards carry no datetime field");
    }
    Ok(Some(table))
}
