//! Connection setup for the target SQLite database.

use crate::schema::{SchemaRegistry, TableKind};
use anyhow::{Context, Result};
use rusqlite::{vtab::csvtab, Connection};
use std::path::Path;
use tracing::info;

/// The single connection used for a whole run.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file. When `reset` is set every
    /// pipeline table is dropped first.
    pub fn open<P: AsRef<Path>>(path: P, registry: &SchemaRegistry, reset: bool) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Could not connect to the database at {:?}", path))?;
        info!("Opened database at {:?}", path);
        Self::prepare(conn, registry, reset)
    }

    pub fn open_in_memory(registry: &SchemaRegistry) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::prepare(conn, registry, false)
    }

    fn prepare(conn: Connection, registry: &SchemaRegistry, reset: bool) -> Result<Self> {
        csvtab::load_module(&conn).context("Failed to register the csv module")?;

        if reset {
            info!("Dropping existing tables");
            registry.schema.drop(&conn)?;
        }
        if registry.schema.create_or_validate(&conn)? {
            info!("Created {} tables", registry.schema.tables.len());
        }
        Ok(Database { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    /// Row count of every pipeline table.
    pub fn counts(&self, registry: &SchemaRegistry) -> Result<Vec<(&'static str, i64)>> {
        let mut counts = Vec::with_capacity(TableKind::ALL.len());
        for kind in TableKind::ALL {
            let name = registry.spec(kind).name();
            let count: i64 =
                self.conn
                    .query_row(&format!("SELECT COUNT(*) FROM {}", name), [], |r| r.get(0))?;
            counts.push((name, count));
        }
        Ok(counts)
    }

    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close the database")
    }
}
