//! The watchlist cache file.
//!
//! A delimited text file with the header `Name;Letterboxd URI;Id;IMDB Id`
//! and one row per record. Reading is header-driven so a raw Letterboxd
//! watchlist export (comma-delimited, no `Id`/`IMDB Id` columns) can seed
//! the cache; columns it lacks come back as `None` and are resolved later.

use std::path::Path;

use crate::error::CacheError;
use crate::types::Record;

/// Header line written at the top of every cache file.
pub const HEADER: &str = "Name;Letterboxd URI;Id;IMDB Id";

const COL_TITLE: &str = "Name";
const COL_URI: &str = "Letterboxd URI";
const COL_LOCAL_ID: &str = "Id";
const COL_GLOBAL_ID: &str = "IMDB Id";

const DELIMITER: u8 = b';';

/// One row as read from a cache file, before resolution.
///
/// `None` means the column does not exist in the file at all; an empty
/// string means the column exists but the cell is blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRow {
    pub title: String,
    pub source_uri: String,
    pub local_id: Option<String>,
    pub global_id: Option<String>,
}

impl CacheRow {
    /// Both identifier columns are present, so no fetch is needed.
    pub fn is_complete(&self) -> bool {
        self.local_id.is_some() && self.global_id.is_some()
    }

    /// Convert a complete row into a record, keeping blank cells blank.
    pub fn into_record(self) -> Record {
        Record {
            local_id: self.local_id.unwrap_or_default(),
            source_uri: self.source_uri,
            global_id: self.global_id.unwrap_or_default(),
            title: self.title,
            ..Default::default()
        }
    }
}

/// Serialize records to cache file text, header included.
pub fn encode_cache(records: &[Record]) -> Result<String, CacheError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    wtr.write_record([COL_TITLE, COL_URI, COL_LOCAL_ID, COL_GLOBAL_ID])?;
    for r in records {
        wtr.write_record([&r.title, &r.source_uri, &r.local_id, &r.global_id])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Overwrite the cache file with `records`.
///
/// The file is written next to the target and renamed over it, so a crash
/// never leaves a half-written cache behind.
pub fn write_cache(path: &Path, records: &[Record]) -> Result<(), CacheError> {
    let contents = encode_cache(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CacheError::io(parent, e))?;
    }
    let tmp = path.with_extension("csv.tmp");
    std::fs::write(&tmp, contents).map_err(|e| CacheError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| CacheError::io(path, e))?;

    log::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write a header-only cache file, used to bootstrap a first refresh.
pub fn init_cache(path: &Path) -> Result<(), CacheError> {
    write_cache(path, &[])
}

/// Pick the field delimiter from the header line: `;` for our own files,
/// `,` for a Letterboxd export.
pub fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(';') {
        b';'
    } else if header.contains(',') {
        b','
    } else {
        DELIMITER
    }
}

/// Parse cache file text into rows.
///
/// Malformed rows and rows without a film URL are skipped with a warning.
pub fn parse_cache(text: &str) -> Result<Vec<CacheRow>, CacheError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(detect_delimiter(text))
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    };

    let uri_col = column(COL_URI).ok_or_else(|| CacheError::MissingColumn(COL_URI.to_string()))?;
    let title_col = column(COL_TITLE);
    let local_col = column(COL_LOCAL_ID);
    let global_col = column(COL_GLOBAL_ID);

    let mut rows = Vec::new();
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping malformed cache row: {e}");
                continue;
            }
        };

        // Text cells are kept as written; id cells tolerate stray padding.
        let cell = |i: usize| record.get(i).unwrap_or("").to_string();
        let id_cell = |i: usize| record.get(i).unwrap_or("").trim().to_string();

        let source_uri = cell(uri_col);
        if source_uri.trim().is_empty() {
            log::warn!("Skipping cache row {} with no film URL", line + 1);
            continue;
        }

        rows.push(CacheRow {
            title: title_col.map(cell).unwrap_or_default(),
            source_uri,
            local_id: local_col.map(id_cell),
            global_id: global_col.map(id_cell),
        });
    }

    Ok(rows)
}

/// Read and parse a cache file.
pub fn read_cache(path: &Path) -> Result<Vec<CacheRow>, CacheError> {
    let text = std::fs::read_to_string(path).map_err(|e| CacheError::io(path, e))?;
    let rows = parse_cache(&text)?;
    log::debug!("Read {} cache rows from {}", rows.len(), path.display());
    Ok(rows)
}
