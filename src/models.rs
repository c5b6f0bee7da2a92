//! Typed rows, one struct per target table.

use crate::schema::TableKind;
use chrono::{DateTime, Datelike, Timelike, Utc};
use rusqlite::types::Value;

/// Format of every `start_time` column.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A row that can be written to one of the pipeline's tables.
pub trait TableRow {
    const KIND: TableKind;

    /// Column values, in the order of the table's load columns.
    fn values(&self) -> Vec<Value>;
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

/// Empty text is stored as NULL.
fn opt_text(s: &Option<String>) -> Value {
    s.as_deref()
        .filter(|s| !s.is_empty())
        .map(text)
        .unwrap_or(Value::Null)
}

fn opt_real(r: Option<f64>) -> Value {
    r.map(Value::Real).unwrap_or(Value::Null)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub song_id: String,
    pub title: String,
    pub artist_id: String,
    pub year: i64,
    pub duration: f64,
}

impl TableRow for Song {
    const KIND: TableKind = TableKind::Songs;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.song_id),
            text(&self.title),
            text(&self.artist_id),
            Value::Integer(self.year),
            Value::Real(self.duration),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    pub artist_id: String,
    pub name: String,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl TableRow for Artist {
    const KIND: TableKind = TableKind::Artists;

    fn values(&self) -> Vec<Value> {
        vec![
            text(&self.artist_id),
            text(&self.name),
            opt_text(&self.location),
            opt_real(self.latitude),
            opt_real(self.longitude),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub user_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub level: String,
}

impl TableRow for User {
    const KIND: TableKind = TableKind::Users;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Integer(self.user_id),
            opt_text(&self.first_name),
            opt_text(&self.last_name),
            opt_text(&self.gender),
            text(&self.level),
        ]
    }
}

/// Calendar decomposition of a play's start time, in UTC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRow {
    pub start_time: DateTime<Utc>,
    pub hour: u32,
    pub day: u32,
    /// ISO 8601 week number.
    pub week: u32,
    pub month: u32,
    pub year: i32,
    /// Monday is 0, Sunday is 6.
    pub weekday: u32,
}

impl TimeRow {
    pub fn from_datetime(start_time: DateTime<Utc>) -> Self {
        TimeRow {
            start_time,
            hour: start_time.hour(),
            day: start_time.day(),
            week: start_time.iso_week().week(),
            month: start_time.month(),
            year: start_time.year(),
            weekday: start_time.weekday().num_days_from_monday(),
        }
    }

    /// Returns `None` when `ts_millis` is outside chrono's representable range.
    pub fn from_epoch_millis(ts_millis: i64) -> Option<Self> {
        DateTime::from_timestamp_millis(ts_millis).map(Self::from_datetime)
    }
}

impl TableRow for TimeRow {
    const KIND: TableKind = TableKind::Time;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.start_time.format(START_TIME_FORMAT).to_string()),
            Value::Integer(self.hour as i64),
            Value::Integer(self.day as i64),
            Value::Integer(self.week as i64),
            Value::Integer(self.month as i64),
            Value::Integer(self.year as i64),
            Value::Integer(self.weekday as i64),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SongPlay {
    pub start_time: DateTime<Utc>,
    pub user_id: i64,
    pub level: String,
    pub song_id: Option<String>,
    pub artist_id: Option<String>,
    pub session_id: i64,
    pub location: Option<String>,
    pub user_agent: Option<String>,
}

impl TableRow for SongPlay {
    const KIND: TableKind = TableKind::SongPlays;

    fn values(&self) -> Vec<Value> {
        vec![
            Value::Text(self.start_time.format(START_TIME_FORMAT).to_string()),
            Value::Integer(self.user_id),
            text(&self.level),
            opt_text(&self.song_id),
            opt_text(&self.artist_id),
            Value::Integer(self.session_id),
            opt_text(&self.location),
            opt_text(&self.user_agent),
        ]
    }
}
