//! Watchlist listing extraction.
//!
//! A watchlist is split into pages of [`PAGE_SIZE`] posters. The first page
//! carries the total entry count on its `.js-watchlist-content` container,
//! which tells us how many pages to walk. Each poster element exposes the
//! site-local film id and a slug that locates the film page.

use scraper::{Html, Selector};

use crate::error::ScrapeError;
use crate::fetch::PageFetcher;

/// Number of posters Letterboxd renders per watchlist page.
pub const PAGE_SIZE: usize = 28;

/// A film as it appears in the live listing, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingItem {
    /// Letterboxd's internal film id (`data-film-id`).
    pub local_id: String,
    /// Absolute URL of the film page.
    pub source_uri: String,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// URL of one page of a user's watchlist (pages are 1-based).
pub fn watchlist_page_url(base_url: &str, username: &str, page: usize) -> String {
    format!(
        "{}/{}/watchlist/page/{}/",
        base_url.trim_end_matches('/'),
        username,
        page
    )
}

/// Build the absolute film URL from a poster's slug attribute.
///
/// Older markup stores a path (`/film/heat/`), newer markup a bare slug
/// (`heat`). Absolute URLs are passed through.
pub fn film_uri(base_url: &str, slug: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if slug.starts_with("http://") || slug.starts_with("https://") {
        slug.to_string()
    } else if slug.starts_with('/') {
        format!("{base}{slug}")
    } else {
        format!("{base}/film/{slug}/")
    }
}

/// Read the declared number of watchlist entries from a listing page.
///
/// Returns `None` if the container or its `data-num-entries` attribute is
/// missing, which usually means the username does not exist.
pub fn total_entries(markup: &str) -> Option<usize> {
    let doc = Html::parse_document(markup);
    let container = selector(".js-watchlist-content");
    doc.select(&container)
        .find_map(|el| el.value().attr("data-num-entries"))
        .and_then(|n| n.trim().parse().ok())
}

/// Number of listing pages needed for `total` entries.
pub fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// Extract every poster on one listing page, in page order.
pub fn parse_listing_page(markup: &str, base_url: &str) -> Vec<ListingItem> {
    let doc = Html::parse_document(markup);
    let poster = selector(".film-poster");

    let mut items = Vec::new();
    for el in doc.select(&poster) {
        let attrs = el.value();
        let local_id = attrs.attr("data-film-id").map(str::trim).unwrap_or("");
        let slug = attrs.attr("data-film-slug").map(str::trim).unwrap_or("");

        if local_id.is_empty() || slug.is_empty() {
            log::debug!("Skipping poster without film id or slug");
            continue;
        }

        items.push(ListingItem {
            local_id: local_id.to_string(),
            source_uri: film_uri(base_url, slug),
        });
    }
    items
}

/// Scrape a user's full watchlist, one page at a time.
///
/// The first page is fetched once: it provides both the entry count and the
/// first batch of posters. Any fetch failure or a missing entry count aborts
/// the scrape, so callers never mistake a partial listing for the real one.
pub async fn scrape_watchlist<F: PageFetcher>(
    fetcher: &F,
    base_url: &str,
    username: &str,
) -> Result<Vec<ListingItem>, ScrapeError> {
    let first_url = watchlist_page_url(base_url, username, 1);
    let first = fetcher.fetch(&first_url).await?;

    let total = total_entries(&first).ok_or_else(|| {
        ScrapeError::markup(format!(
            "no watchlist entry count on {first_url} (wrong username?)"
        ))
    })?;
    let pages = page_count(total);
    log::debug!(
        "Watchlist for '{}': {} entries over {} pages",
        username,
        total,
        pages
    );

    let mut items = Vec::with_capacity(total);
    if pages == 0 {
        return Ok(items);
    }

    items.extend(parse_listing_page(&first, base_url));
    for page in 2..=pages {
        let url = watchlist_page_url(base_url, username, page);
        let markup = fetcher.fetch(&url).await?;
        items.extend(parse_listing_page(&markup, base_url));
    }

    if items.len() != total {
        log::warn!(
            "Watchlist declares {} entries but {} were extracted",
            total,
            items.len()
        );
    }

    Ok(items)
}

/// Like [`scrape_watchlist`], but logs any failure and returns an empty
/// listing.
pub async fn scrape_watchlist_or_empty<F: PageFetcher>(
    fetcher: &F,
    base_url: &str,
    username: &str,
) -> Vec<ListingItem> {
    match scrape_watchlist(fetcher, base_url, username).await {
        Ok(items) => items,
        Err(e) => {
            log::error!("Could not read watchlist for '{}': {}", username, e);
            Vec::new()
        }
    }
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
