//! Build the watchlist dataset from the cache file and the live watchlist.
//!
//! This crate owns the pipeline: read and resolve the cache, scrape the
//! listing, reconcile the two, persist the result, and hand back an
//! immutable [`Dataset`](watchlist_catalog::Dataset).

pub mod builder;
pub mod config;
pub mod error;
pub mod progress;
pub mod reconcile;
pub mod resolve;

pub use builder::{BuildOutcome, build_dataset, into_dataset};
pub use config::{
    ConfigEntry, ConfigOverrides, ConfigSource, FileConfig, FileSection, SyncMode,
    WatchlistConfig, config_entries, config_path, default_cache_path, load_config_file,
    parse_config_file, read_config_file,
};
pub use error::SyncError;
pub use progress::{ItemOutcome, LogProgress, SilentProgress, SyncProgress};
pub use reconcile::{
    ReconcilePlan, ReconcileResult, ReconcileStats, Slot, enrich, plan_reconcile, reconcile,
};
pub use resolve::resolve_rows;
