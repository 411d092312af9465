use serde::Serialize;

use watchlist_catalog::{Catalog, Manifest, MediaType};
use watchlist_sync::{ConfigOverrides, WatchlistConfig};

use crate::commands::build::build;
use crate::error::CliError;

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_catalog(overrides: &ConfigOverrides, quiet: bool) -> Result<Catalog, CliError> {
    let config = WatchlistConfig::load(overrides)?;
    let outcome = build(&config, quiet)?;
    Ok(Catalog::new(outcome.dataset))
}

/// Print the catalog response, optionally narrowed to one type.
pub(crate) fn run_catalog(
    overrides: &ConfigOverrides,
    media_type: Option<MediaType>,
    catalog_id: Option<&str>,
    quiet: bool,
) -> Result<(), CliError> {
    let media_type = match catalog_id {
        Some(id) => Some(Manifest::watchlist().catalog_type(id).ok_or_else(|| {
            CliError::usage(format!("Unknown catalog id '{id}' (see `watchlist manifest`)"))
        })?),
        None => media_type,
    };

    let catalog = load_catalog(overrides, quiet)?;
    print_json(&catalog.catalog_response(media_type))
}

/// Print the stream response for one IMDb id.
pub(crate) fn run_stream(overrides: &ConfigOverrides, id: &str, quiet: bool) -> Result<(), CliError> {
    let catalog = load_catalog(overrides, quiet)?;
    let response = catalog.stream_response(id.trim());
    if response.streams.is_empty() {
        log::warn!("No watchlist entry for {}", id);
    }
    print_json(&response)
}

pub(crate) fn run_manifest() -> Result<(), CliError> {
    print_json(&Manifest::watchlist())
}
