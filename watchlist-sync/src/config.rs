//! Run configuration.
//!
//! Each setting is taken from the first layer that provides it:
//! command-line flags, then environment variables, then the
//! `[watchlist]` table of the config file, then built-in defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use watchlist_scraper::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

use crate::error::SyncError;

/// How the dataset is built. Queries read the cache unless a refresh is
/// asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Scrape the live watchlist and reconcile it with the cache.
    Refresh,
    /// Use the cache file as-is, only filling missing columns.
    #[default]
    CacheOnly,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refresh => write!(f, "refresh"),
            Self::CacheOnly => write!(f, "cache-only"),
        }
    }
}

impl FromStr for SyncMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "refresh" | "scrape" => Ok(Self::Refresh),
            "cache-only" | "cache_only" | "cache" => Ok(Self::CacheOnly),
            other => Err(format!(
                "unknown mode '{other}' (expected refresh or cache-only)"
            )),
        }
    }
}

/// Fully resolved settings for one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistConfig {
    pub username: String,
    pub mode: SyncMode,
    pub cache_path: PathBuf,
    /// Maximum in-flight detail fetches. 1 is strictly sequential.
    pub concurrency: usize,
    /// Keep records without an IMDb id in the dataset under an empty key.
    pub keep_unresolved: bool,
    pub base_url: String,
    pub timeout: Duration,
}

impl WatchlistConfig {
    /// Defaults for `username`, with everything else unset.
    pub fn for_user(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            cache_path: default_cache_path(&username),
            username,
            mode: SyncMode::default(),
            concurrency: 1,
            keep_unresolved: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve from CLI overrides, the process environment and the config file.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self, SyncError> {
        let file = load_config_file();
        Self::resolve(overrides, file.as_ref(), |var| std::env::var(var).ok())
    }

    /// Resolve from explicit layers. `env` looks up an environment variable.
    pub fn resolve(
        overrides: &ConfigOverrides,
        file: Option<&FileConfig>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SyncError> {
        let layers = Layers {
            overrides,
            file,
            env: &env,
        };

        let username = layers
            .raw(Setting::Username)
            .map(|(value, _)| value)
            .ok_or_else(|| {
                SyncError::config(format!(
                    "No Letterboxd username. Pass --user, set {} or add `username` to the config file",
                    Setting::Username.env_var()
                ))
            })?;

        let mut config = Self::for_user(username);
        if let Some(mode) = layers.parse(Setting::Mode, |s| s.parse::<SyncMode>().ok())? {
            config.mode = mode;
        }
        if let Some((path, _)) = layers.raw(Setting::Cache) {
            config.cache_path = PathBuf::from(path);
        }
        if let Some(n) = layers.parse(Setting::Concurrency, |s| {
            s.parse::<usize>().ok().filter(|n| *n > 0)
        })? {
            config.concurrency = n;
        }
        if let Some(keep) = layers.parse(Setting::KeepUnresolved, parse_flag)? {
            config.keep_unresolved = keep;
        }
        if let Some((url, _)) = layers.raw(Setting::BaseUrl) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = layers.parse(Setting::TimeoutSecs, |s| {
            s.parse::<u64>().ok().filter(|n| *n > 0)
        })? {
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// Values given on the command line. `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub username: Option<String>,
    pub mode: Option<SyncMode>,
    pub cache_path: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub keep_unresolved: Option<bool>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// TOML config file format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub watchlist: Option<FileSection>,
}

/// The `[watchlist]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSection {
    pub username: Option<String>,
    pub mode: Option<SyncMode>,
    pub cache: Option<PathBuf>,
    pub concurrency: Option<usize>,
    pub keep_unresolved: Option<bool>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Where a setting's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Cli,
    EnvVar(&'static str),
    ConfigFile,
    Default,
    Missing,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "command line"),
            Self::EnvVar(var) => write!(f, "env ${}", var),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
            Self::Missing => write!(f, "not set"),
        }
    }
}

/// One setting with its effective value and provenance, for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: Option<String>,
    pub source: ConfigSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Setting {
    Username,
    Mode,
    Cache,
    Concurrency,
    KeepUnresolved,
    BaseUrl,
    TimeoutSecs,
}

impl Setting {
    const ALL: [Setting; 7] = [
        Setting::Username,
        Setting::Mode,
        Setting::Cache,
        Setting::Concurrency,
        Setting::KeepUnresolved,
        Setting::BaseUrl,
        Setting::TimeoutSecs,
    ];

    fn key(self) -> &'static str {
        match self {
            Setting::Username => "username",
            Setting::Mode => "mode",
            Setting::Cache => "cache",
            Setting::Concurrency => "concurrency",
            Setting::KeepUnresolved => "keep_unresolved",
            Setting::BaseUrl => "base_url",
            Setting::TimeoutSecs => "timeout_secs",
        }
    }

    fn env_var(self) -> &'static str {
        match self {
            Setting::Username => "WATCHLIST_USERNAME",
            Setting::Mode => "WATCHLIST_MODE",
            Setting::Cache => "WATCHLIST_CACHE",
            Setting::Concurrency => "WATCHLIST_CONCURRENCY",
            Setting::KeepUnresolved => "WATCHLIST_KEEP_UNRESOLVED",
            Setting::BaseUrl => "WATCHLIST_BASE_URL",
            Setting::TimeoutSecs => "WATCHLIST_TIMEOUT_SECS",
        }
    }
}

struct Layers<'a, E> {
    overrides: &'a ConfigOverrides,
    file: Option<&'a FileConfig>,
    env: &'a E,
}

impl<E: Fn(&str) -> Option<String>> Layers<'_, E> {
    fn cli(&self, setting: Setting) -> Option<String> {
        let o = self.overrides;
        match setting {
            Setting::Username => o.username.clone(),
            Setting::Mode => o.mode.map(|m| m.to_string()),
            Setting::Cache => o.cache_path.as_ref().map(|p| p.display().to_string()),
            Setting::Concurrency => o.concurrency.map(|n| n.to_string()),
            Setting::KeepUnresolved => o.keep_unresolved.map(|b| b.to_string()),
            Setting::BaseUrl => o.base_url.clone(),
            Setting::TimeoutSecs => o.timeout_secs.map(|n| n.to_string()),
        }
    }

    fn from_file(&self, setting: Setting) -> Option<String> {
        let s = self.file?.watchlist.as_ref()?;
        match setting {
            Setting::Username => s.username.clone(),
            Setting::Mode => s.mode.map(|m| m.to_string()),
            Setting::Cache => s.cache.as_ref().map(|p| p.display().to_string()),
            Setting::Concurrency => s.concurrency.map(|n| n.to_string()),
            Setting::KeepUnresolved => s.keep_unresolved.map(|b| b.to_string()),
            Setting::BaseUrl => s.base_url.clone(),
            Setting::TimeoutSecs => s.timeout_secs.map(|n| n.to_string()),
        }
    }

    /// First non-blank value across CLI, environment and file.
    fn raw(&self, setting: Setting) -> Option<(String, ConfigSource)> {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        non_blank(self.cli(setting))
            .map(|v| (v, ConfigSource::Cli))
            .or_else(|| {
                non_blank((self.env)(setting.env_var()))
                    .map(|v| (v, ConfigSource::EnvVar(setting.env_var())))
            })
            .or_else(|| non_blank(self.from_file(setting)).map(|v| (v, ConfigSource::ConfigFile)))
            .map(|(v, src)| (v.trim().to_string(), src))
    }

    fn parse<T>(
        &self,
        setting: Setting,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, SyncError> {
        match self.raw(setting) {
            None => Ok(None),
            Some((value, source)) => parse(&value).map(Some).ok_or_else(|| {
                SyncError::config(format!(
                    "Invalid {} '{}' (from {})",
                    setting.key(),
                    value,
                    source
                ))
            }),
        }
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Cache file used when none is configured: `<username>.csv` in the
/// working directory.
pub fn default_cache_path(username: &str) -> PathBuf {
    PathBuf::from(format!("{username}.csv"))
}

/// Every setting with its effective value and where it came from.
pub fn config_entries(
    overrides: &ConfigOverrides,
    file: Option<&FileConfig>,
    env: impl Fn(&str) -> Option<String>,
) -> Vec<ConfigEntry> {
    let layers = Layers {
        overrides,
        file,
        env: &env,
    };
    let username = layers.raw(Setting::Username).map(|(v, _)| v);

    Setting::ALL
        .iter()
        .map(|&setting| {
            let (value, source) = match layers.raw(setting) {
                Some((v, src)) => (Some(v), src),
                None => match default_value(setting, username.as_deref()) {
                    Some(v) => (Some(v), ConfigSource::Default),
                    None => (None, ConfigSource::Missing),
                },
            };
            ConfigEntry {
                key: setting.key(),
                value,
                source,
            }
        })
        .collect()
}

fn default_value(setting: Setting, username: Option<&str>) -> Option<String> {
    match setting {
        Setting::Username => None,
        Setting::Mode => Some(SyncMode::default().to_string()),
        Setting::Cache => username.map(|u| default_cache_path(u).display().to_string()),
        Setting::Concurrency => Some("1".to_string()),
        Setting::KeepUnresolved => Some("false".to_string()),
        Setting::BaseUrl => Some(DEFAULT_BASE_URL.to_string()),
        Setting::TimeoutSecs => Some(DEFAULT_TIMEOUT.as_secs().to_string()),
    }
}

/// Return the path to the config file.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("letterboxd-watchlist").join("config.toml"))
}

/// Parse config file text.
pub fn parse_config_file(text: &str) -> Result<FileConfig, SyncError> {
    toml::from_str(text).map_err(|e| SyncError::config(format!("Invalid config file: {e}")))
}

/// Read a config file. A missing file is not an error.
pub fn read_config_file(path: &Path) -> Result<Option<FileConfig>, SyncError> {
    match std::fs::read_to_string(path) {
        Ok(text) => parse_config_file(&text).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(SyncError::config(format!(
            "Could not read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Load the config file from its standard location, logging and ignoring
/// anything unreadable.
pub fn load_config_file() -> Option<FileConfig> {
    let path = config_path()?;
    match read_config_file(&path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Ignoring config file: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
