#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use watchlist_scraper::{PageFetcher, ScrapeError};

pub const BASE: &str = "https://letterboxd.test";

/// In-memory fetcher that records every request. Unknown URLs are 404s.
#[derive(Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }

    /// Serve a watchlist of `films` (film id, slug) split into 28-poster pages.
    pub fn with_watchlist(mut self, user: &str, films: &[(&str, &str)]) -> Self {
        let chunks: Vec<_> = films.chunks(28).collect();
        if chunks.is_empty() {
            self.pages
                .insert(page_url(user, 1), listing_page(0, &[]));
        }
        for (i, chunk) in chunks.iter().enumerate() {
            self.pages
                .insert(page_url(user, i + 1), listing_page(films.len(), chunk));
        }
        self
    }

    /// Serve a film page with the given film id, title and IMDb id.
    pub fn with_film(self, slug: &str, id: &str, name: &str, imdb: &str) -> Self {
        self.with_page(film_url(slug), film_page(id, name, imdb))
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests_for(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|u| *u == url)
            .count()
    }
}

impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        self.requests.lock().unwrap().push(url.to_string());
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| ScrapeError::NotFound {
                url: url.to_string(),
            })
    }
}

pub fn page_url(user: &str, page: usize) -> String {
    format!("{BASE}/{user}/watchlist/page/{page}/")
}

pub fn film_url(slug: &str) -> String {
    format!("{BASE}/film/{slug}/")
}

pub fn listing_page(total: usize, films: &[(&str, &str)]) -> String {
    let posters: String = films
        .iter()
        .map(|(id, slug)| {
            format!(
                r#"<li class="poster-container"><div class="film-poster" data-film-id="{id}" data-film-slug="/film/{slug}/"></div></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="js-watchlist-content" data-num-entries="{total}"><ul>{posters}</ul></div></body></html>"#
    )
}

pub fn film_page(id: &str, name: &str, imdb: &str) -> String {
    let imdb_link = if imdb.is_empty() {
        String::new()
    } else {
        format!(
            r#"<a href="http://www.imdb.com/title/{imdb}/maindetails" class="micro-button track-event" data-track-action="IMDb">IMDb</a>"#
        )
    };
    format!(
        r#"<html><head><script>var filmData = {{ id: {id}, name: "{name}", releaseYear: "1995" }};</script></head><body>{imdb_link}</body></html>"#
    )
}
