use std::collections::HashMap;
use std::sync::Mutex;

use super::*;

const BASE: &str = "https://letterboxd.com";

struct PageMap {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl PageMap {
    fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: pages.into_iter().collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl PageFetcher for PageMap {
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

fn listing_markup(total: usize, ids: std::ops::Range<usize>) -> String {
    let posters: String = ids
        .map(|i| {
            format!(
                r#"<li><div class="film-poster" data-film-id="{i}" data-film-slug="/film/film-{i}/"></div></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="js-watchlist-content" data-num-entries="{total}"><ul>{posters}</ul></div></body></html>"#
    )
}

#[test]
fn test_watchlist_page_url() {
    assert_eq!(
        watchlist_page_url("https://letterboxd.com/", "alice", 3),
        "https://letterboxd.com/alice/watchlist/page/3/"
    );
}

#[test]
fn test_film_uri_path_slug() {
    assert_eq!(
        film_uri(BASE, "/film/heat/"),
        "https://letterboxd.com/film/heat/"
    );
}

#[test]
fn test_film_uri_bare_slug() {
    assert_eq!(film_uri(BASE, "heat"), "https://letterboxd.com/film/heat/");
}

#[test]
fn test_film_uri_absolute() {
    assert_eq!(
        film_uri(BASE, "https://example.com/film/x/"),
        "https://example.com/film/x/"
    );
}

#[test]
fn test_page_count() {
    assert_eq!(page_count(0), 0);
    assert_eq!(page_count(1), 1);
    assert_eq!(page_count(28), 1);
    assert_eq!(page_count(29), 2);
    assert_eq!(page_count(56), 2);
    assert_eq!(page_count(57), 3);
}

#[test]
fn test_total_entries() {
    assert_eq!(total_entries(&listing_markup(30, 0..0)), Some(30));
    assert_eq!(total_entries("<html><body><p>Sorry</p></body></html>"), None);
}

#[test]
fn test_total_entries_unparsable() {
    let markup = r#"<div class="js-watchlist-content" data-num-entries="lots"></div>"#;
    assert_eq!(total_entries(markup), None);
}

#[test]
fn test_parse_listing_page_order() {
    let items = parse_listing_page(&listing_markup(3, 0..3), BASE);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].local_id, "0");
    assert_eq!(items[0].source_uri, "https://letterboxd.com/film/film-0/");
    assert_eq!(items[2].local_id, "2");
}

#[test]
fn test_parse_listing_page_skips_incomplete_posters() {
    let markup = r#"
        <div class="film-poster" data-film-id="1" data-film-slug="/film/a/"></div>
        <div class="film-poster" data-film-slug="/film/b/"></div>
        <div class="film-poster" data-film-id="3" data-film-slug=""></div>
    "#;
    let items = parse_listing_page(markup, BASE);
    assert_eq!(
        items,
        vec![ListingItem {
            local_id: "1".to_string(),
            source_uri: "https://letterboxd.com/film/a/".to_string(),
        }]
    );
}

#[tokio::test]
async fn test_scrape_watchlist_two_pages_two_fetches() {
    let fetcher = PageMap::new(vec![
        (
            watchlist_page_url(BASE, "alice", 1),
            listing_markup(30, 0..28),
        ),
        (
            watchlist_page_url(BASE, "alice", 2),
            listing_markup(30, 28..30),
        ),
    ]);

    let items = scrape_watchlist(&fetcher, BASE, "alice").await.unwrap();
    assert_eq!(items.len(), 30);
    assert_eq!(fetcher.request_count(), 2);
    assert_eq!(items[0].local_id, "0");
    assert_eq!(items[29].local_id, "29");
}

#[tokio::test]
async fn test_scrape_watchlist_empty_list() {
    let fetcher = PageMap::new(vec![(
        watchlist_page_url(BASE, "alice", 1),
        listing_markup(0, 0..0),
    )]);

    let items = scrape_watchlist(&fetcher, BASE, "alice").await.unwrap();
    assert!(items.is_empty());
    assert_eq!(fetcher.request_count(), 1);
}

#[tokio::test]
async fn test_scrape_watchlist_missing_count_is_markup_error() {
    let fetcher = PageMap::new(vec![(
        watchlist_page_url(BASE, "ghost", 1),
        "<html><body>Sorry, we can't find the page</body></html>".to_string(),
    )]);

    let err = scrape_watchlist(&fetcher, BASE, "ghost").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Markup(_)));
}

#[tokio::test]
async fn test_scrape_watchlist_failed_later_page_aborts() {
    let fetcher = PageMap::new(vec![(
        watchlist_page_url(BASE, "alice", 1),
        listing_markup(30, 0..28),
    )]);

    let err = scrape_watchlist(&fetcher, BASE, "alice").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_scrape_watchlist_or_empty_on_failure() {
    let fetcher = PageMap::new(vec![]);
    let items = scrape_watchlist_or_empty(&fetcher, BASE, "alice").await;
    assert!(items.is_empty());
    assert_eq!(fetcher.request_count(), 1);
}
