use std::io::IsTerminal;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use watchlist_catalog::init_cache;
use watchlist_scraper::HttpFetcher;
use watchlist_sync::{
    BuildOutcome, ConfigOverrides, LogProgress, SyncMode, WatchlistConfig, build_dataset,
};

use crate::error::CliError;
use crate::progress::{BarProgress, wants_bar};

/// Build the dataset for the resolved configuration.
pub(crate) fn build(config: &WatchlistConfig, quiet: bool) -> Result<BuildOutcome, CliError> {
    let fetcher = HttpFetcher::new(config.timeout)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::runtime(format!("Failed to create tokio runtime: {e}")))?;

    let outcome = if wants_bar(quiet, std::io::stderr().is_terminal()) {
        rt.block_on(build_dataset(&fetcher, config, &BarProgress::new()))?
    } else {
        rt.block_on(build_dataset(&fetcher, config, &LogProgress))?
    };
    Ok(outcome)
}

/// Build the dataset and print a summary.
pub(crate) fn run_build(overrides: &ConfigOverrides, quiet: bool) -> Result<(), CliError> {
    let config = WatchlistConfig::load(overrides)?;
    log::debug!(
        "Building for '{}' ({}, cache {})",
        config.username,
        config.mode,
        config.cache_path.display()
    );

    let outcome = build(&config, quiet)?;

    log::info!("");
    log::info!(
        "{} {} entries in catalog, {} saved to {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        outcome.dataset.len(),
        outcome.persisted,
        config.cache_path.display().if_supports_color(Stderr, |t| t.cyan()),
    );

    if let Some(stats) = &outcome.reconcile {
        log::info!(
            "  {} kept, {} fetched, {} removed",
            stats.kept,
            stats.fetched,
            stats.dropped
        );
        if stats.duplicates > 0 {
            log::info!("  {} duplicate entries ignored", stats.duplicates);
        }
    } else if config.mode == SyncMode::Refresh && outcome.listing_failed {
        log::warn!(
            "  {}",
            "Watchlist could not be read; catalog built from the cache only"
                .if_supports_color(Stderr, |t| t.yellow())
        );
    }

    if !outcome.unresolved.is_empty() {
        let note = if config.keep_unresolved {
            "kept under an empty id"
        } else {
            "left out of the catalog"
        };
        log::warn!(
            "  {} without an IMDb id ({}):",
            outcome.unresolved.len(),
            note
        );
        for record in &outcome.unresolved {
            log::warn!(
                "    {} {}",
                record.title,
                record.source_uri.if_supports_color(Stderr, |t| t.dimmed())
            );
        }
    }

    Ok(())
}

/// Write a header-only cache file.
pub(crate) fn run_init(overrides: &ConfigOverrides, force: bool) -> Result<(), CliError> {
    let config = WatchlistConfig::load(overrides)?;
    let path = &config.cache_path;

    if path.exists() && !force {
        return Err(CliError::usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    init_cache(path)?;
    log::info!(
        "{} Created {}",
        "\u{2714}".if_supports_color(Stderr, |t| t.green()),
        path.display().if_supports_color(Stderr, |t| t.cyan()),
    );
    Ok(())
}
