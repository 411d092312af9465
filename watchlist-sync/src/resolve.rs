//! Fill in cache columns that a file does not have.

use futures::stream::{self, StreamExt};
use watchlist_catalog::{CacheRow, Record};
use watchlist_scraper::{DetailField, PageFetcher, extract_detail, fetch_or_empty};

use crate::progress::{ItemOutcome, SyncProgress};

/// Turn cache rows into records, fetching the film page for any row that
/// lacks an `Id` or `IMDB Id` column.
///
/// Rows with both columns present never cause a fetch, even when a cell is
/// blank. A failed fetch leaves the missing fields empty. Output order
/// matches input order.
pub async fn resolve_rows<F, P>(
    fetcher: &F,
    rows: Vec<CacheRow>,
    concurrency: usize,
    progress: &P,
) -> Vec<Record>
where
    F: PageFetcher,
    P: SyncProgress + ?Sized,
{
    let total = rows.len();
    let resolved = stream::iter(rows)
        .map(|row| resolve_row(fetcher, row))
        .buffered(concurrency.max(1));
    let mut resolved = std::pin::pin!(resolved);

    let mut records = Vec::with_capacity(total);
    while let Some((record, outcome)) = resolved.next().await {
        progress.on_item(records.len() + 1, total, &record.title, outcome);
        records.push(record);
    }
    records
}

async fn resolve_row<F: PageFetcher>(fetcher: &F, row: CacheRow) -> (Record, ItemOutcome) {
    if row.is_complete() {
        return (row.into_record(), ItemOutcome::Cached);
    }

    let markup = fetch_or_empty(fetcher, &row.source_uri).await;
    let field = |which: DetailField| {
        if markup.is_empty() {
            return String::new();
        }
        extract_detail(&markup, which).unwrap_or_else(|e| {
            log::warn!("Could not read {} for {}: {}", which, row.source_uri, e);
            String::new()
        })
    };

    let local_id = row
        .local_id
        .clone()
        .unwrap_or_else(|| field(DetailField::LocalId));
    let global_id = row
        .global_id
        .clone()
        .unwrap_or_else(|| field(DetailField::GlobalId));

    let record = Record {
        local_id,
        global_id,
        ..row.into_record()
    };
    (record, ItemOutcome::Resolved)
}
