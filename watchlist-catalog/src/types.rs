//! Core record types shared by every stage of the pipeline.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Content type as understood by the add-on protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
}

impl MediaType {
    pub const ALL: [MediaType; 2] = [MediaType::Movie, MediaType::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(Self::Movie),
            "series" | "show" | "tv" => Ok(Self::Series),
            other => Err(format!("unknown media type '{other}' (expected movie or series)")),
        }
    }
}

/// One watchlist entry.
///
/// `global_id` is the IMDb id and becomes the lookup key once the record is
/// in a [`Dataset`](crate::Dataset). It is empty when extraction failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Letterboxd film id.
    pub local_id: String,
    /// Absolute Letterboxd film URL.
    pub source_uri: String,
    pub global_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
}

impl Record {
    /// Whether the record has an IMDb id to be keyed by.
    pub fn is_resolved(&self) -> bool {
        !self.global_id.is_empty()
    }
}
