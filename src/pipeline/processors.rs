//! Per-file processing functions handed to [`super::process_data`].

use crate::extract::{extract_log_file, extract_song_file, SqliteCatalog};
use crate::loader::load_rows;
use crate::schema::SchemaRegistry;
use anyhow::{Context, Result};
use rusqlite::Transaction;
use std::path::Path;
use tracing::debug;

/// Loads the songs and artists of one song metadata file.
pub fn process_song_file(
    tx: &mut Transaction<'_>,
    registry: &SchemaRegistry,
    path: &Path,
) -> Result<()> {
    let batch = extract_song_file(path)?;
    if batch.len() != 1 {
        debug!("{:?} holds {} song records", path, batch.len());
    }

    load_rows(tx, registry, &batch.songs).context("Failed to load songs")?;
    load_rows(tx, registry, &batch.artists).context("Failed to load artists")?;
    Ok(())
}

/// Loads the time, user and songplay rows of one event log file.
pub fn process_log_file(
    tx: &mut Transaction<'_>,
    registry: &SchemaRegistry,
    path: &Path,
) -> Result<()> {
    let batch = {
        let catalog = SqliteCatalog::new(tx, registry.song_select);
        extract_log_file(path, &catalog)?
    };
    let matched = batch
        .songplays
        .iter()
        .filter(|p| p.song_id.is_some())
        .count();
    debug!(
        "{:?}: {} plays ({} matched in catalog), {} other events skipped",
        path,
        batch.songplays.len(),
        matched,
        batch.skipped
    );

    let time = load_rows(tx, registry, &batch.time).context("Failed to load time rows")?;
    let users = load_rows(tx, registry, &batch.users).context("Failed to load users")?;
    load_rows(tx, registry, &batch.songplays).context("Failed to load songplays")?;
    debug!("time: {:?}, users: {:?}", time, users);
    Ok(())
}
