//! Bulk append through SQLite's CSV virtual table.
//!
//! The delimited buffer is spooled to a temporary file, mounted as a
//! `temp.` virtual table and copied into the target with one
//! `INSERT ... SELECT`.

use super::LoadError;
use crate::schema::TableSpec;
use crate::sqlite_persistence::SqlType;
use rusqlite::Connection;
use std::io::Write;
use tracing::warn;

fn staging_table(spec: &TableSpec) -> String {
    format!("bulk_{}", spec.name())
}

/// Staging columns are all text; cast them back and map empty fields of
/// nullable columns to NULL.
fn select_expression(spec: &TableSpec, column: &str, index: usize) -> String {
    let field = if spec.is_nullable(column) {
        format!("NULLIF(c{}, '')", index)
    } else {
        format!("c{}", index)
    };
    match spec.table.column(column).map(|c| c.sql_type) {
        Some(SqlType::Integer) => format!("CAST({} AS INTEGER)", field),
        Some(SqlType::Real) => format!("CAST({} AS REAL)", field),
        _ => field,
    }
}

/// Appends every line of `buffer` to the target table. Returns the number of
/// inserted rows.
pub fn bulk_append(conn: &Connection, spec: &TableSpec, buffer: &str) -> Result<usize, LoadError> {
    let mut file = tempfile::Builder::new()
        .prefix("songplay-etl-")
        .suffix(".csv")
        .tempfile()?;
    file.write_all(buffer.as_bytes())?;
    file.flush()?;

    // The path ends up inside a module argument, which cannot escape quotes.
    let path = file
        .path()
        .to_str()
        .filter(|p| !p.contains(['\'', '=', ',']))
        .ok_or_else(|| LoadError::StagingPath(file.path().to_path_buf()))?;

    let staging = staging_table(spec);
    let staging_columns = (0..spec.load_columns.len())
        .map(|i| format!("c{} TEXT", i))
        .collect::<Vec<_>>()
        .join(", ");
    conn.execute_batch(&format!(
        "DROP TABLE IF EXISTS temp.{staging};
         CREATE VIRTUAL TABLE temp.{staging} USING csv(
             filename='{path}',
             header=no,
             delimiter='{delimiter}',
             schema='CREATE TABLE x({columns})'
         );",
        staging = staging,
        path = path,
        delimiter = spec.delimiter.as_char(),
        columns = staging_columns,
    ))?;

    let select = spec
        .load_columns
        .iter()
        .enumerate()
        .map(|(index, column)| select_expression(spec, column, index))
        .collect::<Vec<_>>()
        .join(", ");
    let inserted = conn.execute(
        &format!(
            "INSERT INTO {} ({}) SELECT {} FROM temp.{}",
            spec.name(),
            spec.load_columns.join(", "),
            select,
            staging
        ),
        [],
    );

    if let Err(e) = conn.execute_batch(&format!("DROP TABLE IF EXISTS temp.{}", staging)) {
        warn!("Failed to drop staging table {}: {}", staging, e);
    }

    Ok(inserted?)
}
