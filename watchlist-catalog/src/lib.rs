//! Watchlist data model, cache file I/O, and the catalog query surface.
//!
//! This crate knows nothing about scraping. It defines the [`Record`] that
//! flows through the pipeline, reads and writes the `;`-delimited cache
//! file, holds the built [`Dataset`], and answers catalog and stream
//! queries against it in the add-on's JSON shapes.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod manifest;
pub mod query;
pub mod types;

pub use cache::{CacheRow, HEADER, encode_cache, init_cache, parse_cache, read_cache, write_cache};
pub use dataset::Dataset;
pub use error::CacheError;
pub use manifest::{Manifest, ManifestCatalog};
pub use query::{Catalog, CatalogResponse, MetaPreview, Stream, StreamResponse, poster_url};
pub use types::*;
