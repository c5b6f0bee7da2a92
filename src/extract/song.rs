//! Song metadata files: one song and its artist per JSON object.

use super::ExtractError;
use crate::models::{Artist, Song};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct SongRecord {
    song_id: String,
    title: String,
    artist_id: String,
    #[serde(default)]
    year: i64,
    duration: f64,
    artist_name: String,
    #[serde(default)]
    artist_location: Option<String>,
    #[serde(default)]
    artist_latitude: Option<f64>,
    #[serde(default)]
    artist_longitude: Option<f64>,
}

impl SongRecord {
    fn into_rows(self) -> (Song, Artist) {
        let song = Song {
            song_id: self.song_id,
            title: self.title,
            artist_id: self.artist_id.clone(),
            year: self.year,
            duration: self.duration,
        };
        let artist = Artist {
            artist_id: self.artist_id,
            name: self.artist_name,
            location: self.artist_location.filter(|l| !l.is_empty()),
            latitude: self.artist_latitude,
            longitude: self.artist_longitude,
        };
        (song, artist)
    }
}

/// Rows extracted from one song metadata file.
#[derive(Debug, Default)]
pub struct SongBatch {
    pub songs: Vec<Song>,
    pub artists: Vec<Artist>,
}

impl SongBatch {
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    fn push(&mut self, record: SongRecord) {
        let (song, artist) = record.into_rows();
        self.songs.push(song);
        self.artists.push(artist);
    }
}

/// Line on which the value following `offset` starts.
fn line_of(content: &str, offset: usize) -> usize {
    let rest = &content[offset..];
    let start = offset + (rest.len() - rest.trim_start().len());
    content[..start].matches('\n').count() + 1
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parses song metadata. A file normally holds a single object, but arrays of
/// objects and concatenated objects are accepted too; every record yields
/// its own song and artist row.
pub fn parse_song_records(path: &Path, content: &str) -> Result<SongBatch, ExtractError> {
    let mut batch = SongBatch::default();
    let mut stream = serde_json::Deserializer::from_str(content).into_iter::<Value>();

    loop {
        let start = stream.byte_offset();
        let value = match stream.next() {
            None => break,
            Some(value) => value.map_err(|source| ExtractError::Json {
                path: path.to_path_buf(),
                line: source.line(),
                source,
            })?,
        };
        let line = line_of(content, start);

        let records = match value {
            Value::Object(_) => vec![value],
            Value::Array(items) => items,
            other => {
                return Err(ExtractError::UnexpectedShape {
                    path: path.to_path_buf(),
                    found: value_kind(&other),
                })
            }
        };

        for record in records {
            let record: SongRecord =
                serde_json::from_value(record).map_err(|source| ExtractError::Json {
                    path: path.to_path_buf(),
                    line,
                    source,
                })?;
            batch.push(record);
        }
    }

    Ok(batch)
}

pub fn extract_song_file(path: &Path) -> Result<SongBatch, ExtractError> {
    let content = std::fs::read_to_string(path).map_err(|source| ExtractError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_song_records(path, &content)
}
