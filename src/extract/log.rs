//! Event log files: newline-delimited JSON, one app event per line.

use super::{CatalogLookup, ExtractError};
use crate::models::{SongPlay, TimeRow, User};
use serde::Deserialize;
use std::path::Path;

/// `page` value of an event that represents a song being played.
pub const PLAY_PAGE: &str = "NextSong";

/// Ids show up both as JSON numbers and as numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IdValue {
    Number(i64),
    Text(String),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    page: Option<String>,
    ts: Option<i64>,
    user_id: Option<IdValue>,
    first_name: Option<String>,
    last_name: Option<String>,
    gender: Option<String>,
    level: Option<String>,
    song: Option<String>,
    artist: Option<String>,
    length: Option<f64>,
    session_id: Option<IdValue>,
    location: Option<String>,
    user_agent: Option<String>,
}

/// Rows extracted from one event log file.
#[derive(Debug, Default)]
pub struct LogBatch {
    pub time: Vec<TimeRow>,
    pub users: Vec<User>,
    pub songplays: Vec<SongPlay>,
    /// Events dropped because they were not plays.
    pub skipped: usize,
}

/// Removes embedded double quotes so the text survives a delimited bulk load.
fn sanitize_user_agent(user_agent: &str) -> String {
    user_agent.replace('"', "")
}

struct LineContext<'a> {
    path: &'a Path,
    line: usize,
}

impl LineContext<'_> {
    fn required<T>(&self, value: Option<T>, field: &'static str) -> Result<T, ExtractError> {
        value.ok_or_else(|| ExtractError::MissingField {
            path: self.path.to_path_buf(),
            line: self.line,
            field,
        })
    }

    fn id(&self, value: Option<IdValue>, field: &'static str) -> Result<i64, ExtractError> {
        match self.required(value, field)? {
            IdValue::Number(n) => Ok(n),
            IdValue::Text(s) if s.trim().is_empty() => Err(ExtractError::MissingField {
                path: self.path.to_path_buf(),
                line: self.line,
                field,
            }),
            IdValue::Text(s) => s.trim().parse().map_err(|_| ExtractError::InvalidField {
                path: self.path.to_path_buf(),
                line: self.line,
                field,
                value: s,
            }),
        }
    }
}

fn resolve_play(
    ctx: &LineContext,
    event: &RawEvent,
    lookup: &dyn CatalogLookup,
) -> Result<(Option<String>, Option<String>), ExtractError> {
    let (Some(title), Some(artist), Some(length)) = (&event.song, &event.artist, event.length)
    else {
        return Ok((None, None));
    };
    let found = lookup
        .lookup(title, artist, length)
        .map_err(|e| ExtractError::Lookup {
            path: ctx.path.to_path_buf(),
            line: ctx.line,
            source: e.into(),
        })?;
    Ok(match found {
        Some(m) => (Some(m.song_id), Some(m.artist_id)),
        None => (None, None),
    })
}

/// Parses an event log, keeping only play events. Each play yields a time
/// row, a user row and a songplay row whose song and artist ids come from
/// `lookup` (both `None` when the catalog has no match).
pub fn parse_log_events(
    path: &Path,
    content: &str,
    lookup: &dyn CatalogLookup,
) -> Result<LogBatch, ExtractError> {
    let mut batch = LogBatch::default();

    for (index, raw_line) in content.lines().enumerate() {
        let ctx = LineContext {
            path,
            line: index + 1,
        };
        if raw_line.trim().is_empty() {
            continue;
        }
        let event: RawEvent =
            serde_json::from_str(raw_line).map_err(|source| ExtractError::Json {
                path: path.to_path_buf(),
                line: ctx.line,
                source,
            })?;
        if event.page.as_deref() != Some(PLAY_PAGE) {
            batch.skipped += 1;
            continue;
        }

        let ts = ctx.required(event.ts, "ts")?;
        let time = TimeRow::from_epoch_millis(ts).ok_or_else(|| ExtractError::InvalidField {
            path: path.to_path_buf(),
            line: ctx.line,
            field: "ts",
            value: ts.to_string(),
        })?;
        let (song_id, artist_id) = resolve_play(&ctx, &event, lookup)?;

        let RawEvent {
            user_id,
            first_name,
            last_name,
            gender,
            level,
            session_id,
            location,
            user_agent,
            ..
        } = event;
        let user_id = ctx.id(user_id, "userId")?;
        let level = ctx.required(level, "level")?;
        let session_id = ctx.id(session_id, "sessionId")?;

        batch.songplays.push(SongPlay {
            start_time: time.start_time,
            user_id,
            level: level.clone(),
            song_id,
            artist_id,
            session_id,
            location,
            user_agent: user_agent.as_deref().map(sanitize_user_agent),
        });
        batch.users.push(User {
            user_id,
            first_name,
            last_name,
            gender,
            level,
        });
        batch.time.push(time);
    }

    Ok(batch)
}

pub fn extract_log_file(path: &Path, lookup: &dyn CatalogLookup) -> Result<LogBatch, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_log_events(path, &content, lookup)
}
