//! Letterboxd page scraping.
//!
//! Fetches watchlist listing pages and film pages and pulls out the few
//! fields the catalog needs: the site-local film id, the film URL, the
//! IMDb id and the display title.

pub mod detail;
pub mod error;
pub mod fetch;
pub mod film_data;
pub mod listing;

pub use detail::{
    DetailField, detail_or_empty, extract_detail, fetch_detail, fetch_global_id, fetch_local_id,
    fetch_title, global_id_or_empty, local_id_or_empty, parse_film_data, parse_imdb_id,
    title_or_empty,
};
pub use error::ScrapeError;
pub use fetch::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT, HttpFetcher, PageFetcher, fetch_or_empty};
pub use film_data::FilmData;
pub use listing::{
    ListingItem, PAGE_SIZE, parse_listing_page, scrape_watchlist, scrape_watchlist_or_empty,
    total_entries,
};
