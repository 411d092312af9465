//! Merge the live watchlist with cached records.
//!
//! The live listing is authoritative for membership and order. Cached
//! records are reused by Letterboxd film id; listing entries with no cached
//! record are enriched with two detail fetches (IMDb id, then title);
//! cached records no longer in the listing are dropped.

use std::collections::{HashMap, HashSet};

use futures::stream::{self, StreamExt};
use watchlist_catalog::Record;
use watchlist_scraper::{ListingItem, PageFetcher, global_id_or_empty, title_or_empty};

use crate::progress::{ItemOutcome, SyncProgress};

/// One output position of a reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Reuse the cached record unchanged.
    Cached(Record),
    /// Not cached: fetch details for this listing entry.
    Fetch(ListingItem),
}

/// What a reconciliation will do, before any fetch happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Output slots in listing order.
    pub slots: Vec<Slot>,
    /// Cached records whose film id is no longer in the listing.
    pub dropped: Vec<Record>,
    /// Repeated film ids, in either the listing or the cache, that were ignored.
    pub duplicates: usize,
}

impl ReconcilePlan {
    pub fn fetch_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s, Slot::Fetch(_)))
            .count()
    }
}

/// Statistics from a reconciliation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileStats {
    pub kept: usize,
    pub fetched: usize,
    pub dropped: usize,
    pub duplicates: usize,
    /// Fetched records whose IMDb id came back empty.
    pub unresolved: usize,
}

/// Reconciled records plus what changed.
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub records: Vec<Record>,
    pub dropped: Vec<Record>,
    pub stats: ReconcileStats,
}

/// Decide, without fetching, which listing entries can reuse a cached record.
pub fn plan_reconcile(listing: Vec<ListingItem>, cached: Vec<Record>) -> ReconcilePlan {
    let mut duplicates = 0;

    // First cached record per film id wins.
    let mut by_id: HashMap<String, usize> = HashMap::with_capacity(cached.len());
    let mut cached: Vec<Option<Record>> = cached.into_iter().map(Some).collect();
    for (pos, slot) in cached.iter_mut().enumerate() {
        let Some(record) = slot else { continue };
        if by_id.contains_key(&record.local_id) {
            log::debug!("Ignoring duplicate cache row for film id {}", record.local_id);
            *slot = None;
            duplicates += 1;
        } else {
            by_id.insert(record.local_id.clone(), pos);
        }
    }

    let mut seen = HashSet::with_capacity(listing.len());
    let mut slots = Vec::with_capacity(listing.len());
    for item in listing {
        if !seen.insert(item.local_id.clone()) {
            log::debug!("Ignoring repeated listing entry for film id {}", item.local_id);
            duplicates += 1;
            continue;
        }

        let hit = by_id
            .get(&item.local_id)
            .and_then(|&pos| cached[pos].take());
        slots.push(match hit {
            Some(record) => Slot::Cached(record),
            None => Slot::Fetch(item),
        });
    }

    let dropped = cached.into_iter().flatten().collect();

    ReconcilePlan {
        slots,
        dropped,
        duplicates,
    }
}

/// Fetch the IMDb id and title for a listing entry that has no cached record.
pub async fn enrich<F: PageFetcher>(fetcher: &F, item: ListingItem) -> Record {
    let global_id = global_id_or_empty(fetcher, &item.source_uri).await;
    let title = title_or_empty(fetcher, &item.source_uri).await;
    Record {
        local_id: item.local_id,
        source_uri: item.source_uri,
        global_id,
        title,
        ..Default::default()
    }
}

/// Reconcile the live listing against cached records.
///
/// Output order equals listing order. At most `concurrency` entries are
/// enriched at once; 1 keeps every fetch strictly sequential.
pub async fn reconcile<F, P>(
    fetcher: &F,
    listing: Vec<ListingItem>,
    cached: Vec<Record>,
    concurrency: usize,
    progress: &P,
) -> ReconcileResult
where
    F: PageFetcher,
    P: SyncProgress + ?Sized,
{
    let plan = plan_reconcile(listing, cached);
    let total = plan.slots.len();
    let mut stats = ReconcileStats {
        dropped: plan.dropped.len(),
        duplicates: plan.duplicates,
        ..Default::default()
    };

    for record in &plan.dropped {
        log::info!("No longer in watchlist: {}", record.title);
    }

    let outcomes = stream::iter(plan.slots)
        .map(|slot| async move {
            match slot {
                Slot::Cached(record) => (record, ItemOutcome::Cached),
                Slot::Fetch(item) => (enrich(fetcher, item).await, ItemOutcome::Fetched),
            }
        })
        .buffered(concurrency.max(1));
    let mut outcomes = std::pin::pin!(outcomes);

    let mut records = Vec::with_capacity(total);
    while let Some((record, outcome)) = outcomes.next().await {
        match outcome {
            ItemOutcome::Fetched => {
                stats.fetched += 1;
                if !record.is_resolved() {
                    stats.unresolved += 1;
                }
            }
            _ => stats.kept += 1,
        }
        progress.on_item(records.len() + 1, total, &record.title, outcome);
        records.push(record);
    }

    ReconcileResult {
        records,
        dropped: plan.dropped,
        stats,
    }
}

#[cfg(test)]
#[path = "tests/reconcile_tests.rs"]
mod tests;
