//! Build the dataset: cache, listing, reconcile, persist.

use watchlist_catalog::{Dataset, MediaType, Record, read_cache, write_cache};
use watchlist_scraper::{PageFetcher, scrape_watchlist};

use crate::config::{SyncMode, WatchlistConfig};
use crate::error::SyncError;
use crate::progress::SyncProgress;
use crate::reconcile::{ReconcileStats, reconcile};
use crate::resolve::resolve_rows;

/// Result of a build.
#[derive(Debug)]
pub struct BuildOutcome {
    pub dataset: Dataset,
    /// Number of records written back to the cache file.
    pub persisted: usize,
    /// Records with no IMDb id. Excluded from the dataset unless
    /// `keep_unresolved` is set.
    pub unresolved: Vec<Record>,
    /// Present when the live listing was scraped and reconciled.
    pub reconcile: Option<ReconcileStats>,
    /// The live listing could not be read and the cache was kept as-is.
    pub listing_failed: bool,
}

/// Build the dataset according to `config.mode`.
///
/// The cache file must exist in both modes. In refresh mode a listing that
/// cannot be scraped leaves the cached records untouched rather than
/// reconciling against an empty watchlist.
pub async fn build_dataset<F, P>(
    fetcher: &F,
    config: &WatchlistConfig,
    progress: &P,
) -> Result<BuildOutcome, SyncError>
where
    F: PageFetcher,
    P: SyncProgress + ?Sized,
{
    let path = &config.cache_path;
    if !path.is_file() {
        return Err(SyncError::CacheNotFound(path.clone()));
    }

    progress.on_phase(&format!("Reading cache {}", path.display()));
    let rows = read_cache(path)?;
    let cached = resolve_rows(fetcher, rows, config.concurrency, progress).await;

    let mut listing_failed = false;
    let (records, stats) = match config.mode {
        SyncMode::CacheOnly => (cached, None),
        SyncMode::Refresh => {
            progress.on_phase(&format!("Scraping watchlist for {}", config.username));
            match scrape_watchlist(fetcher, &config.base_url, &config.username).await {
                Ok(listing) => {
                    progress.on_phase(&format!(
                        "Reconciling {} watchlist entries with {} cached records",
                        listing.len(),
                        cached.len()
                    ));
                    let result =
                        reconcile(fetcher, listing, cached, config.concurrency, progress).await;
                    (result.records, Some(result.stats))
                }
                Err(e) => {
                    let hint = if e.is_transient() {
                        " (try again later)"
                    } else if e.is_not_found() {
                        " (check the username)"
                    } else {
                        ""
                    };
                    log::error!(
                        "Could not read watchlist for '{}': {}{}. Keeping cached records",
                        config.username,
                        e,
                        hint
                    );
                    listing_failed = true;
                    (cached, None)
                }
            }
        }
    };

    write_cache(path, &records)?;
    let persisted = records.len();
    log::info!("File saved: {} ({} records)", path.display(), persisted);

    let (dataset, unresolved) = into_dataset(records, config.keep_unresolved);
    progress.on_complete(&format!("{} movies found", dataset.len()));

    Ok(BuildOutcome {
        dataset,
        persisted,
        unresolved,
        reconcile: stats,
        listing_failed,
    })
}

/// Key records by IMDb id, stamping every one as a movie.
///
/// Records without an IMDb id are returned separately. With
/// `keep_unresolved` they are also inserted under the empty key, where
/// later ones replace earlier ones.
pub fn into_dataset(records: Vec<Record>, keep_unresolved: bool) -> (Dataset, Vec<Record>) {
    let mut unresolved = Vec::new();
    let mut keyed = Vec::with_capacity(records.len());

    for mut record in records {
        record.media_type = MediaType::Movie;
        if !record.is_resolved() {
            log::warn!(
                "No IMDb id for '{}' ({})",
                record.title,
                record.source_uri
            );
            unresolved.push(record.clone());
            if !keep_unresolved {
                continue;
            }
        }
        keyed.push(record);
    }

    (keyed.into_iter().collect(), unresolved)
}
