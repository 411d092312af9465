//! watchlist CLI
//!
//! Builds a catalog from a Letterboxd watchlist and answers catalog and
//! stream queries against it.

mod commands;
mod error;
mod logging;
mod progress;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use watchlist_catalog::MediaType;
use watchlist_sync::{ConfigOverrides, SyncMode};

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Letterboxd watchlist as a catalog", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Settings that override the environment and the config file.
#[derive(Args, Clone, Default)]
struct ConfigArgs {
    /// Letterboxd username
    #[arg(short, long, global = true)]
    user: Option<String>,

    /// Cache file (default: <username>.csv)
    #[arg(long, global = true)]
    cache: Option<PathBuf>,

    /// Build mode: cache-only (default) or refresh (scrape and reconcile)
    #[arg(long, global = true)]
    mode: Option<SyncMode>,

    /// Maximum concurrent film page fetches
    #[arg(short = 'j', long, global = true)]
    concurrency: Option<usize>,

    /// Keep films without an IMDb id in the catalog (--keep-unresolved=false
    /// turns it off)
    #[arg(
        long,
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    keep_unresolved: Option<bool>,

    /// Site root to scrape (for testing against a mirror)
    #[arg(long, global = true, hide = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,
}

impl ConfigArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            username: self.user.clone(),
            mode: self.mode,
            cache_path: self.cache.clone(),
            concurrency: self.concurrency,
            keep_unresolved: self.keep_unresolved,
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dataset and update the cache file
    Build,

    /// Print the catalog response as JSON
    Catalog {
        /// Only list entries of this type (movie or series)
        #[arg(long = "type")]
        media_type: Option<MediaType>,

        /// Catalog id from the manifest (e.g. letterboxd-watchlist-movies)
        #[arg(long, conflicts_with = "media_type")]
        id: Option<String>,
    },

    /// Print the stream response for an IMDb id as JSON
    Stream {
        /// IMDb id, e.g. tt0113277
        id: String,
    },

    /// Print the add-on manifest as JSON
    Manifest,

    /// Create an empty cache file so a first refresh can run
    Init {
        /// Overwrite an existing cache file
        #[arg(long)]
        force: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show effective settings and where each comes from
    Show,

    /// Print the config file path
    Path,
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = run(cli) {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let overrides = cli.config.overrides();
    let quiet = cli.quiet;

    match cli.command {
        Commands::Build => commands::build::run_build(&overrides, quiet),
        Commands::Catalog { media_type, id } => {
            commands::query::run_catalog(&overrides, media_type, id.as_deref(), quiet)
        }
        Commands::Stream { id } => commands::query::run_stream(&overrides, &id, quiet),
        Commands::Manifest => commands::query::run_manifest(),
        Commands::Init { force } => commands::build::run_init(&overrides, force),
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                commands::config::run_config_show(&overrides);
                Ok(())
            }
            ConfigAction::Path => commands::config::run_config_path(),
        },
    }
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
