//! Schema and statement registry.
//!
//! Everything the loader, the extractor and the database layer need to know
//! about the target tables lives in a [`SchemaRegistry`] value that is passed
//! around explicitly.

mod tables;

pub use tables::{
    ARTISTS_TABLE, SONGPLAYS_TABLE, SONGPLAY_SCHEMA, SONGS_TABLE, TIME_TABLE, USERS_TABLE,
};

use crate::sqlite_persistence::{Table, VersionedSchema};

/// The five tables the pipeline writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Songs,
    Artists,
    Users,
    Time,
    SongPlays,
}

impl TableKind {
    pub const ALL: [TableKind; 5] = [
        TableKind::Songs,
        TableKind::Artists,
        TableKind::Users,
        TableKind::Time,
        TableKind::SongPlays,
    ];
}

/// Field separator used when a batch is serialized for a bulk append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    /// For tables with free-text fields that routinely contain commas.
    Tab,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
        }
    }
}

/// What the loader does when a bulk append hits a key conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Roll back the bulk append and insert row by row.
    Fallback,
    /// No natural key: always bulk append, errors propagate.
    AppendOnly,
}

pub struct TableSpec {
    pub table: &'static Table,
    /// Columns written by the pipeline, in the order rows yield their values.
    pub load_columns: &'static [&'static str],
    /// Single-row parameterized insert used by the fallback path.
    pub insert: &'static str,
    pub delimiter: Delimiter,
    pub conflict: ConflictPolicy,
}

impl TableSpec {
    pub fn name(&self) -> &'static str {
        self.table.name
    }

    /// Whether an empty field in the delimited buffer should load as NULL.
    pub fn is_nullable(&self, column: &str) -> bool {
        self.table
            .column(column)
            .map(|c| !c.non_null)
            .unwrap_or(true)
    }
}

pub struct SchemaRegistry {
    pub schema: &'static VersionedSchema,
    pub songs: TableSpec,
    pub artists: TableSpec,
    pub users: TableSpec,
    pub time: TableSpec,
    pub songplays: TableSpec,
    /// Resolves `(title, artist name, duration)` to `(song_id, artist_id)`.
    pub song_select: &'static str,
}

impl SchemaRegistry {
    pub fn spec(&self, kind: TableKind) -> &TableSpec {
        match kind {
            TableKind::Songs => &self.songs,
            TableKind::Artists => &self.artists,
            TableKind::Users => &self.users,
            TableKind::Time => &self.time,
            TableKind::SongPlays => &self.songplays,
        }
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        SchemaRegistry {
            schema: &SONGPLAY_SCHEMA,
            songs: TableSpec {
                table: &SONGS_TABLE,
                load_columns: &["song_id", "title", "artist_id", "year", "duration"],
                insert: tables::SONG_INSERT,
                delimiter: Delimiter::Tab,
                conflict: ConflictPolicy::Fallback,
            },
            artists: TableSpec {
                table: &ARTISTS_TABLE,
                load_columns: &["artist_id", "name", "location", "latitude", "longitude"],
                insert: tables::ARTIST_INSERT,
                delimiter: Delimiter::Tab,
                conflict: ConflictPolicy::Fallback,
            },
            users: TableSpec {
                table: &USERS_TABLE,
                load_columns: &["user_id", "first_name", "last_name", "gender", "level"],
                insert: tables::USER_INSERT,
                delimiter: Delimiter::Comma,
                conflict: ConflictPolicy::Fallback,
            },
            time: TableSpec {
                table: &TIME_TABLE,
                load_columns: &[
                    "start_time",
                    "hour",
                    "day",
                    "week",
                    "month",
                    "year",
                    "weekday",
                ],
                insert: tables::TIME_INSERT,
                delimiter: Delimiter::Comma,
                conflict: ConflictPolicy::Fallback,
            },
            songplays: TableSpec {
                table: &SONGPLAYS_TABLE,
                load_columns: &[
                    "start_time",
                    "user_id",
                    "level",
                    "song_id",
                    "artist_id",
                    "session_id",
                    "location",
                    "user_agent",
                ],
                insert: tables::SONGPLAY_INSERT,
                delimiter: Delimiter::Tab,
                conflict: ConflictPolicy::AppendOnly,
            },
            song_select: tables::SONG_SELECT,
        }
    }
}
