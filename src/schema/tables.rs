//! Table definitions and statement templates for the songplay star schema.
//!
//! `songplays` is the fact table; `songs`, `artists`, `users` and `time` are
//! dimensions keyed by their natural identifiers.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, SqlType, Table, VersionedSchema};

pub const SONGS_TABLE: Table = Table {
    name: "songs",
    columns: &[
        sqlite_column!("song_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("title", &SqlType::Text, non_null = true),
        sqlite_column!("artist_id", &SqlType::Text, non_null = true),
        sqlite_column!("year", &SqlType::Integer),
        sqlite_column!("duration", &SqlType::Real),
    ],
    indices: &[("idx_songs_title", "title")],
};

pub const ARTISTS_TABLE: Table = Table {
    name: "artists",
    columns: &[
        sqlite_column!("artist_id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("latitude", &SqlType::Real),
        sqlite_column!("longitude", &SqlType::Real),
    ],
    indices: &[("idx_artists_name", "name")],
};

pub const USERS_TABLE: Table = Table {
    name: "users",
    columns: &[
        sqlite_column!("user_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("first_name", &SqlType::Text),
        sqlite_column!("last_name", &SqlType::Text),
        sqlite_column!("gender", &SqlType::Text),
        sqlite_column!("level", &SqlType::Text, non_null = true),
    ],
    indices: &[],
};

/// Start times are UTC text, `YYYY-MM-DD HH:MM:SS.mmm`.
pub const TIME_TABLE: Table = Table {
    name: "time",
    columns: &[
        sqlite_column!("start_time", &SqlType::Text, is_primary_key = true),
        sqlite_column!("hour", &SqlType::Integer, non_null = true),
        sqlite_column!("day", &SqlType::Integer, non_null = true),
        sqlite_column!("week", &SqlType::Integer, non_null = true),
        sqlite_column!("month", &SqlType::Integer, non_null = true),
        sqlite_column!("year", &SqlType::Integer, non_null = true),
        sqlite_column!("weekday", &SqlType::Integer, non_null = true),
    ],
    indices: &[],
};

pub const SONGPLAYS_TABLE: Table = Table {
    name: "songplays",
    columns: &[
        sqlite_column!("songplay_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("start_time", &SqlType::Text, non_null = true),
        sqlite_column!("user_id", &SqlType::Integer, non_null = true),
        sqlite_column!("level", &SqlType::Text, non_null = true),
        sqlite_column!("song_id", &SqlType::Text),
        sqlite_column!("artist_id", &SqlType::Text),
        sqlite_column!("session_id", &SqlType::Integer, non_null = true),
        sqlite_column!("location", &SqlType::Text),
        sqlite_column!("user_agent", &SqlType::Text),
    ],
    indices: &[
        ("idx_songplays_start_time", "start_time"),
        ("idx_songplays_user", "user_id"),
    ],
};

pub const SONGPLAY_SCHEMA: VersionedSchema = VersionedSchema {
    version: 0,
    tables: &[
        SONGPLAYS_TABLE,
        USERS_TABLE,
        SONGS_TABLE,
        ARTISTS_TABLE,
        TIME_TABLE,
    ],
};

pub const SONG_INSERT: &str = "INSERT INTO songs (song_id, title, artist_id, year, duration) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(song_id) DO NOTHING";

pub const ARTIST_INSERT: &str = "INSERT INTO artists (artist_id, name, location, latitude, longitude) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(artist_id) DO NOTHING";

// A repeated user keeps their latest subscription level.
pub const USER_INSERT: &str = "INSERT INTO users (user_id, first_name, last_name, gender, level) \
     VALUES (?1, ?2, ?3, ?4, ?5) \
     ON CONFLICT(user_id) DO UPDATE SET level = excluded.level";

pub const TIME_INSERT: &str = "INSERT INTO time (start_time, hour, day, week, month, year, weekday) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
     ON CONFLICT(start_time) DO NOTHING";

/// Not reached by the loader while `songplays` is append only; kept so every
/// registered table has a single-row statement.
pub const SONGPLAY_INSERT: &str = "INSERT INTO songplays (start_time, user_id, level, song_id, \
     artist_id, session_id, location, user_agent) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

pub const SONG_SELECT: &str = "SELECT s.song_id, a.artist_id FROM songs s \
     JOIN artists a ON a.artist_id = s.artist_id \
     WHERE s.title = ?1 AND a.name = ?2 AND s.duration = ?3";
