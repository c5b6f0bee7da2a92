//! Crawl, extract and load, one committed transaction per file.

mod processors;

pub use processors::{process_log_file, process_song_file};

use crate::config::AppConfig;
use crate::crawler::find_files;
use crate::database::Database;
use crate::schema::SchemaRegistry;
use anyhow::{Context, Result};
use rusqlite::{Connection, Transaction};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub files_found: usize,
    pub files_processed: usize,
}

/// Runs `func` on every file under `root` with the given extension, in crawl
/// order. Each file gets its own transaction, committed once `func` returns.
/// The first failure stops the run; files committed before it stay.
pub fn process_data<F>(
    conn: &mut Connection,
    registry: &SchemaRegistry,
    root: &Path,
    extension: &str,
    mut func: F,
) -> Result<RunSummary>
where
    F: FnMut(&mut Transaction<'_>, &SchemaRegistry, &Path) -> Result<()>,
{
    let files = find_files(root, extension)?;
    let mut summary = RunSummary {
        files_found: files.len(),
        files_processed: 0,
    };
    info!("{} files found in {}", summary.files_found, root.display());

    for file in &files {
        let mut tx = conn.transaction()?;
        func(&mut tx, registry, file).with_context(|| format!("Failed to process {:?}", file))?;
        tx.commit()
            .with_context(|| format!("Failed to commit {:?}", file))?;
        summary.files_processed += 1;
        info!(
            "{}/{} files processed.",
            summary.files_processed, summary.files_found
        );
    }

    Ok(summary)
}

/// Loads the song tree, then the log tree, so plays can be resolved against
/// the songs loaded first.
pub fn run(db: &mut Database, registry: &SchemaRegistry, config: &AppConfig) -> Result<()> {
    let extension = config.file_extension.as_str();

    process_data(
        db.connection_mut(),
        registry,
        &config.song_data_dir,
        extension,
        process_song_file,
    )
    .context("Song data load failed")?;
    process_data(
        db.connection_mut(),
        registry,
        &config.log_data_dir,
        extension,
        process_log_file,
    )
    .context("Log data load failed")?;

    for (table, count) in db.counts(registry)? {
        info!("{}: {} rows", table, count);
    }
    Ok(())
}
