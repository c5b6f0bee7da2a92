use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Foreign keys resolved for a play event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch {
    pub song_id: String,
    pub artist_id: String,
}

/// Exact-match resolution of a played track against the stored catalog.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait CatalogLookup {
    /// `Ok(None)` when no stored song matches; that is not an error.
    fn lookup(&self, title: &str, artist: &str, duration: f64) -> Result<Option<CatalogMatch>>;
}

/// Resolves plays against the `songs` and `artists` tables.
pub struct SqliteCatalog<'c> {
    conn: &'c Connection,
    song_select: &'static str,
}

impl<'c> SqliteCatalog<'c> {
    pub fn new(conn: &'c Connection, song_select: &'static str) -> Self {
        Self { conn, song_select }
    }
}

impl CatalogLookup for SqliteCatalog<'_> {
    fn lookup(&self, title: &str, artist: &str, duration: f64) -> Result<Option<CatalogMatch>> {
        let mut stmt = self.conn.prepare_cached(self.song_select)?;
        let found = stmt
            .query_row(params![title, artist, duration], |row| {
                Ok(CatalogMatch {
                    song_id: row.get(0)?,
                    artist_id: row.get(1)?,
                })
            })
            .optional()?;
        Ok(found)
    }
}
