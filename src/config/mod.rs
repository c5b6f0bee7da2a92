mod file_config;

pub use file_config::FileConfig;

use anyhow::{bail, Result};
use std::path::PathBuf;

pub const DEFAULT_DATABASE_PATH: &str = "sparkifydb.sqlite";
pub const DEFAULT_SONG_DATA_DIR: &str = "data/song_data";
pub const DEFAULT_LOG_DATA_DIR: &str = "data/log_data";
pub const DEFAULT_FILE_EXTENSION: &str = "json";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub database_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    pub file_extension: String,
    pub reset: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            database_path: PathBuf::from(DEFAULT_DATABASE_PATH),
            song_data_dir: PathBuf::from(DEFAULT_SONG_DATA_DIR),
            log_data_dir: PathBuf::from(DEFAULT_LOG_DATA_DIR),
            file_extension: DEFAULT_FILE_EXTENSION.to_string(),
            reset: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub song_data_dir: PathBuf,
    pub log_data_dir: PathBuf,
    /// Extension of source files, without the leading dot.
    pub file_extension: String,
    /// Drop and recreate every table before loading.
    pub reset: bool,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let database_path = file
            .database_path
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.database_path.clone());
        let song_data_dir = file
            .song_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.song_data_dir.clone());
        let log_data_dir = file
            .log_data_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| cli.log_data_dir.clone());
        let file_extension = file
            .file_extension
            .unwrap_or_else(|| cli.file_extension.clone())
            .trim_start_matches('.')
            .to_string();
        let reset = file.reset.unwrap_or(cli.reset);

        if file_extension.is_empty() {
            bail!("file_extension must not be empty");
        }
        for (name, dir) in [("song_data_dir", &song_data_dir), ("log_data_dir", &log_data_dir)] {
            if !dir.exists() {
                bail!("{} does not exist: {:?}", name, dir);
            }
            if !dir.is_dir() {
                bail!("{} is not a directory: {:?}", name, dir);
            }
        }

        Ok(AppConfig {
            database_path,
            song_data_dir,
            log_data_dir,
            file_extension,
            reset,
        })
    }
}
