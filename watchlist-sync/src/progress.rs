//! Build progress reporting.

/// What happened to one entry while building the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Reused from the cache without any fetch.
    Cached,
    /// New in the watchlist; details were fetched.
    Fetched,
    /// A cache row whose missing columns were filled by a fetch.
    Resolved,
}

/// Trait for receiving build progress updates.
pub trait SyncProgress {
    /// Called when a phase starts (e.g., "Scraping watchlist for alice").
    fn on_phase(&self, message: &str);

    /// Called after each entry is processed, in output order.
    fn on_item(&self, current: usize, total: usize, title: &str, outcome: ItemOutcome);

    /// Called when the build is complete.
    fn on_complete(&self, message: &str);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl SyncProgress for SilentProgress {
    fn on_phase(&self, _message: &str) {}
    fn on_item(&self, _current: usize, _total: usize, _title: &str, _outcome: ItemOutcome) {}
    fn on_complete(&self, _message: &str) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl SyncProgress for LogProgress {
    fn on_item(&self, current: usize, total: usize, title: &str, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Cached => log::debug!("In cache: {} ({}/{})", title, current, total),
            ItemOutcome::Fetched => log::info!("Fetched: {} ({}/{})", title, current, total),
            ItemOutcome::Resolved => log::info!("Resolved: {} ({}/{})", title, current, total),
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
