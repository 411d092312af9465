use serde::{Deserialize, Serialize};

use crate::types::MediaType;

pub const ADDON_ID: &str = "org.yofardev.letterboxd";
pub const MOVIES_CATALOG_ID: &str = "letterboxd-watchlist-movies";
pub const SERIES_CATALOG_ID: &str = "letterboxd-watchlist-series";

/// Add-on manifest describing what the catalog serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub id: String,
    pub version: String,
    pub name: String,
    pub description: String,
    pub resources: Vec<String>,
    pub types: Vec<MediaType>,
    pub catalogs: Vec<ManifestCatalog>,
    pub id_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestCatalog {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub id: String,
}

impl Manifest {
    /// The manifest for the watchlist catalog: one catalog per media type,
    /// IMDb ids only.
    pub fn watchlist() -> Self {
        Self {
            id: ADDON_ID.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: "Watchlist".to_string(),
            description: "Import Letterboxd watchlist from CSV file".to_string(),
            resources: vec!["catalog".to_string(), "stream".to_string()],
            types: MediaType::ALL.to_vec(),
            catalogs: MediaType::ALL
                .iter()
                .map(|&media_type| ManifestCatalog {
                    media_type,
                    id: catalog_id(media_type).to_string(),
                })
                .collect(),
            id_prefixes: vec!["tt".to_string()],
        }
    }

    /// Media type served by a catalog id declared in this manifest.
    pub fn catalog_type(&self, catalog_id: &str) -> Option<MediaType> {
        self.catalogs
            .iter()
            .find(|c| c.id == catalog_id)
            .map(|c| c.media_type)
    }
}

pub fn catalog_id(media_type: MediaType) -> &'static str {
    match media_type {
        MediaType::Movie => MOVIES_CATALOG_ID,
        MediaType::Series => SERIES_CATALOG_ID,
    }
}
