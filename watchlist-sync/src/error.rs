use std::path::PathBuf;

use watchlist_catalog::CacheError;

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error(
        "No cache file at {}. Run `watchlist init` to create one, or place a Letterboxd watchlist export there",
        .0.display()
    )]
    CacheNotFound(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SyncError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
