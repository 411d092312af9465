use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use watchlist_sync::{ConfigOverrides, config_entries, config_path, read_config_file};

use crate::error::CliError;

/// Show effective settings and their sources.
pub(crate) fn run_config_show(overrides: &ConfigOverrides) {
    let path = config_path();

    log::info!(
        "{}",
        "Watchlist Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    let file = match &path {
        Some(p) if p.exists() => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(exists)".if_supports_color(Stdout, |t| t.green()),
            );
            match read_config_file(p) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!(
                        "  {} {}",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        e
                    );
                    None
                }
            }
        }
        Some(p) => {
            log::info!(
                "  Config file: {} {}",
                p.display().if_supports_color(Stdout, |t| t.cyan()),
                "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
            );
            None
        }
        None => {
            log::info!(
                "  Config file: {}",
                "could not determine path".if_supports_color(Stdout, |t| t.red()),
            );
            None
        }
    };
    log::info!("");

    let entries = config_entries(overrides, file.as_ref(), |var| std::env::var(var).ok());
    for entry in &entries {
        let source_str = format!("({})", entry.source);
        let name = format!("{}:", entry.key);
        match &entry.value {
            Some(v) => {
                log::info!(
                    "  {} {} {}",
                    name.if_supports_color(Stdout, |t| t.cyan()),
                    v,
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
            None => {
                log::info!(
                    "  {} {} {}",
                    name.if_supports_color(Stdout, |t| t.cyan()),
                    "not set".if_supports_color(Stdout, |t| t.yellow()),
                    source_str.if_supports_color(Stdout, |t| t.dimmed()),
                );
            }
        }
    }
}

/// Print the config file path.
pub(crate) fn run_config_path() -> Result<(), CliError> {
    match config_path() {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::usage("Could not determine config directory")),
    }
}
