//! Record extraction: turns one source file into typed table rows.

mod catalog;
mod log;
mod song;

pub use catalog::{CatalogLookup, CatalogMatch, SqliteCatalog};
#[cfg(any(test, feature = "mock"))]
pub use catalog::MockCatalogLookup;
pub use log::{extract_log_file, parse_log_events, LogBatch, PLAY_PAGE};
pub use song::{extract_song_file, parse_song_records, SongBatch};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while extracting a source file.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path:?} at line {line}: {source}")]
    Json {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Expected a JSON object or an array of objects in {path:?}, found {found}")]
    UnexpectedShape { path: PathBuf, found: &'static str },

    #[error("Record at line {line} of {path:?} is missing field '{field}'")]
    MissingField {
        path: PathBuf,
        line: usize,
        field: &'static str,
    },

    #[error("Record at line {line} of {path:?} has invalid {field}: {value}")]
    InvalidField {
        path: PathBuf,
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("Catalog lookup failed for line {line} of {path:?}: {source}")]
    Lookup {
        path: PathBuf,
        line: usize,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
