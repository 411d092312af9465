//! Catalog and stream lookups over a built [`Dataset`].
//!
//! Response types serialize to the add-on protocol's JSON bodies
//! (`{"metas": [...]}` and `{"streams": [...]}`).

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::types::{MediaType, Record};

const POSTER_BASE_URL: &str = "https://images.metahub.space/poster/medium";

/// Display name attached to every stream entry.
const STREAM_NAME: &str = "Letterboxd";

/// Catalog entry as shown in a catalog listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaPreview {
    pub id: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub name: String,
    pub poster: String,
}

/// A playable (here: linkable) source for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stream {
    pub name: String,
    pub title: String,
    pub external_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub metas: Vec<MetaPreview>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamResponse {
    pub streams: Vec<Stream>,
}

/// Poster image URL for an IMDb id.
pub fn poster_url(id: &str) -> String {
    format!("{POSTER_BASE_URL}/{id}/img")
}

/// The id part of a dataset key; episode-style keys (`tt123:1:2`) keep
/// only the title id.
fn preview_id(key: &str) -> &str {
    key.split(':').next().unwrap_or(key)
}

fn preview(record: &Record) -> MetaPreview {
    let id = preview_id(&record.global_id);
    MetaPreview {
        id: id.to_string(),
        media_type: record.media_type,
        name: record.title.clone(),
        poster: poster_url(id),
    }
}

fn stream(record: &Record) -> Stream {
    Stream {
        name: STREAM_NAME.to_string(),
        title: record.title.clone(),
        external_url: record.source_uri.clone(),
    }
}

/// Read-only query surface that owns the built dataset.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    dataset: Dataset,
}

impl Catalog {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Every record, in dataset order.
    pub fn list_catalog(&self) -> Vec<MetaPreview> {
        self.dataset.iter().map(preview).collect()
    }

    /// Records of one media type, in dataset order.
    pub fn list_catalog_of(&self, media_type: MediaType) -> Vec<MetaPreview> {
        self.dataset
            .iter()
            .filter(|r| r.media_type == media_type)
            .map(preview)
            .collect()
    }

    /// Exact-match lookup by IMDb id. Returns zero or one stream.
    pub fn lookup_stream(&self, id: &str) -> Vec<Stream> {
        self.dataset.get(id).map(stream).into_iter().collect()
    }

    pub fn catalog_response(&self, media_type: Option<MediaType>) -> CatalogResponse {
        let metas = match media_type {
            Some(t) => self.list_catalog_of(t),
            None => self.list_catalog(),
        };
        CatalogResponse { metas }
    }

    pub fn stream_response(&self, id: &str) -> StreamResponse {
        StreamResponse {
            streams: self.lookup_stream(id),
        }
    }
}

#[cfg(test)]
#[path = "tests/query_tests.rs"]
mod tests;
