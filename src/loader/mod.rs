//! Conflict-aware loading of row batches.
//!
//! Batches go through a single bulk append first. For keyed tables a
//! UNIQUE/PRIMARY KEY violation rolls the append back and the rows are
//! inserted one by one with the table's single-row statement, which handles
//! conflicts itself. Errors raised on the row-by-row path are not caught.

mod bulk;
mod delimited;

pub use bulk::bulk_append;
pub use delimited::to_delimited;

use crate::models::TableRow;
use crate::schema::{ConflictPolicy, SchemaRegistry, TableSpec};
use rusqlite::{ffi, params_from_iter, Connection, ErrorCode, Transaction};
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to stage bulk load buffer: {0}")]
    Staging(#[from] std::io::Error),

    #[error("Staging file path {0:?} cannot be used in a module argument")]
    StagingPath(PathBuf),
}

impl LoadError {
    pub fn is_unique_violation(&self) -> bool {
        match self {
            LoadError::Sqlite(e) => is_unique_violation(e),
            _ => false,
        }
    }
}

pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && matches!(
                    e.extended_code,
                    ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
        }
        _ => false,
    }
}

/// Which path a batch went through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Empty,
    Bulk { rows: usize },
    RowByRow { rows: usize },
}

fn insert_row_by_row<R: TableRow>(
    conn: &Connection,
    spec: &TableSpec,
    rows: &[R],
) -> Result<(), LoadError> {
    let mut stmt = conn.prepare_cached(spec.insert)?;
    for row in rows {
        stmt.execute(params_from_iter(row.values()))?;
    }
    Ok(())
}

/// Loads `rows` into the table registered for `R`.
pub fn load_rows<R: TableRow>(
    tx: &mut Transaction<'_>,
    registry: &SchemaRegistry,
    rows: &[R],
) -> Result<LoadOutcome, LoadError> {
    let spec = registry.spec(R::KIND);
    if rows.is_empty() {
        return Ok(LoadOutcome::Empty);
    }
    let buffer = to_delimited(spec, rows);

    if spec.conflict == ConflictPolicy::AppendOnly {
        bulk_append(tx, spec, &buffer)?;
        return Ok(LoadOutcome::Bulk { rows: rows.len() });
    }

    {
        let mut savepoint = tx.savepoint()?;
        match bulk_append(&savepoint, spec, &buffer) {
            Ok(_) => {
                savepoint.commit()?;
                return Ok(LoadOutcome::Bulk { rows: rows.len() });
            }
            Err(e) if e.is_unique_violation() => {
                debug!(
                    "Bulk append into {} hit a key conflict, inserting {} rows one by one",
                    spec.name(),
                    rows.len()
                );
                savepoint.rollback()?;
            }
            Err(e) => return Err(e),
        }
    }

    insert_row_by_row(tx, spec, rows)?;
    Ok(LoadOutcome::RowByRow { rows: rows.len() })
}
