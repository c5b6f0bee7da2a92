use anyhow::{Context, Result};
use clap::Parser;
use songplay_etl::config::{
    AppConfig, CliConfig, FileConfig, DEFAULT_DATABASE_PATH, DEFAULT_FILE_EXTENSION,
    DEFAULT_LOG_DATA_DIR, DEFAULT_SONG_DATA_DIR,
};
use songplay_etl::{pipeline, Database, SchemaRegistry};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
#[command(name = "songplay-etl")]
#[command(about = "Load song metadata and event logs into a SQLite star schema")]
struct CliArgs {
    /// Path to a TOML config file. Its values override the CLI arguments.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,

    /// Path to the SQLite database file (created if missing).
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_DATABASE_PATH)]
    pub database: PathBuf,

    /// Root of the song metadata tree.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_SONG_DATA_DIR)]
    pub song_data: PathBuf,

    /// Root of the event log tree.
    #[clap(long, value_parser = parse_path, default_value = DEFAULT_LOG_DATA_DIR)]
    pub log_data: PathBuf,

    /// Extension of the source files.
    #[clap(long, default_value = DEFAULT_FILE_EXTENSION)]
    pub extension: String,

    /// Drop and recreate all tables before loading.
    #[clap(long, default_value_t = false)]
    pub reset: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let cli_config = CliConfig {
        database_path: cli_args.database,
        song_data_dir: cli_args.song_data,
        log_data_dir: cli_args.log_data,
        file_extension: cli_args.extension,
        reset: cli_args.reset,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let registry = SchemaRegistry::default();
    let mut db = Database::open(&config.database_path, &registry, config.reset)?;

    pipeline::run(&mut db, &registry, &config)?;

    db.close()?;
    info!("Done.");
    Ok(())
}
