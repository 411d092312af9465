//! Per-film detail extraction.
//!
//! Two independent sources on a film page:
//! - the embedded `filmData` script object (local id, title)
//! - the IMDb cross-reference link (global id)
//!
//! Each lookup fetches the film page on its own; callers decide whether a
//! failure is fatal ([`fetch_detail`]) or degrades to an empty string
//! ([`detail_or_empty`]).

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;
use crate::film_data::{self, FilmData};

static IMDB_TITLE_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/title/([a-z0-9]+)").expect("static regex"));

/// Which field to pull out of a film page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailField {
    /// IMDb id (`tt…`) from the cross-reference link.
    GlobalId,
    /// Display title from `filmData.name`.
    Title,
    /// Letterboxd film id from `filmData.id`.
    LocalId,
}

impl std::fmt::Display for DetailField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DetailField::GlobalId => write!(f, "IMDb id"),
            DetailField::Title => write!(f, "title"),
            DetailField::LocalId => write!(f, "film id"),
        }
    }
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Locate the script declaring `filmData` and parse its object literal.
pub fn parse_film_data(markup: &str) -> Option<FilmData> {
    let doc = Html::parse_document(markup);
    let script = selector("script");
    doc.select(&script).find_map(|el| {
        let text: String = el.text().collect();
        if text.contains("filmData") {
            film_data::parse_film_data_script(&text)
        } else {
            None
        }
    })
}

/// Extract the IMDb id from the page's IMDb link.
///
/// Prefers the tracked `IMDb` button; falls back to any link into
/// `imdb.com/title/`.
pub fn parse_imdb_id(markup: &str) -> Option<String> {
    let doc = Html::parse_document(markup);
    let tracked = selector(r#"a.track-event[data-track-action="IMDb"]"#);
    let any_imdb = selector(r#"a[href*="imdb.com/title/"]"#);

    doc.select(&tracked)
        .chain(doc.select(&any_imdb))
        .filter_map(|el| el.value().attr("href"))
        .find_map(imdb_id_from_href)
}

/// Pull the id out of an IMDb URL such as `https://www.imdb.com/title/tt0113277/maindetails`.
pub fn imdb_id_from_href(href: &str) -> Option<String> {
    IMDB_TITLE_PATH
        .captures(href)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read one field from already-fetched film page markup.
pub fn extract_detail(markup: &str, field: DetailField) -> Result<String, ScrapeError> {
    match field {
        DetailField::GlobalId => {
            parse_imdb_id(markup).ok_or_else(|| ScrapeError::markup("no IMDb link on film page"))
        }
        DetailField::Title | DetailField::LocalId => {
            let data = parse_film_data(markup)
                .ok_or_else(|| ScrapeError::markup("no filmData block on film page"))?;
            let key = if field == DetailField::Title { "name" } else { "id" };
            data.get(key)
                .map(str::to_string)
                .ok_or_else(|| ScrapeError::markup(format!("filmData has no '{key}'")))
        }
    }
}

/// Fetch a film page and read one field from it.
pub async fn fetch_detail<F: PageFetcher>(
    fetcher: &F,
    uri: &str,
    field: DetailField,
) -> Result<String, ScrapeError> {
    let markup = fetcher.fetch(uri).await?;
    extract_detail(&markup, field)
}

/// Fetch a film page and read one field, logging any failure and returning
/// an empty string instead.
pub async fn detail_or_empty<F: PageFetcher>(fetcher: &F, uri: &str, field: DetailField) -> String {
    match fetch_detail(fetcher, uri, field).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read {} for {}: {}", field, uri, e);
            String::new()
        }
    }
}

pub async fn fetch_global_id<F: PageFetcher>(fetcher: &F, uri: &str) -> Result<String, ScrapeError> {
    fetch_detail(fetcher, uri, DetailField::GlobalId).await
}

pub async fn fetch_title<F: PageFetcher>(fetcher: &F, uri: &str) -> Result<String, ScrapeError> {
    fetch_detail(fetcher, uri, DetailField::Title).await
}

pub async fn fetch_local_id<F: PageFetcher>(fetcher: &F, uri: &str) -> Result<String, ScrapeError> {
    fetch_detail(fetcher, uri, DetailField::LocalId).await
}

pub async fn global_id_or_empty<F: PageFetcher>(fetcher: &F, uri: &str) -> String {
    detail_or_empty(fetcher, uri, DetailField::GlobalId).await
}

pub async fn title_or_empty<F: PageFetcher>(fetcher: &F, uri: &str) -> String {
    detail_or_empty(fetcher, uri, DetailField::Title).await
}

pub async fn local_id_or_empty<F: PageFetcher>(fetcher: &F, uri: &str) -> String {
    detail_or_empty(fetcher, uri, DetailField::LocalId).await
}

#[cfg(test)]
#[path = "tests/detail_tests.rs"]
mod tests;
