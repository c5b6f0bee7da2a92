//! Songplay ETL Library
//!
//! Loads song metadata and app event logs into a SQLite star schema.

pub mod config;
pub mod crawler;
pub mod database;
pub mod extract;
pub mod loader;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use database::Database;
pub use pipeline::{process_data, run, RunSummary};
pub use schema::SchemaRegistry;
