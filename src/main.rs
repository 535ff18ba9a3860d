use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tunes_catalog_server::catalog::Catalog;
use tunes_catalog_server::catalog_store::SqliteRowStore;
use tunes_catalog_server::config::{AppConfig, CliConfig, FileConfig, DEFAULT_READ_POOL_SIZE};
use tunes_catalog_server::server::{run_server, RequestsLoggingLevel, ServerConfig};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    if path_buf.is_absolute() {
        return Ok(path_buf);
    }
    let cwd = std::env::current_dir().context("Could not resolve current directory")?;
    Ok(cwd.join(path_buf))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// SQLite catalog database, created if missing.
    #[clap(long, value_parser = parse_path)]
    pub db_path: Option<PathBuf>,

    #[clap(short, long, default_value_t = 3001)]
    pub port: u16,

    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    #[clap(long, default_value_t = DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,

    /// Base URL used in response hyperlinks, defaults to http://localhost:<port>.
    #[clap(long)]
    pub public_base_url: Option<String>,

    /// TOML file whose values override the command line.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db_path: self.db_path.clone(),
            port: self.port,
            logging_level: self.logging_level.clone(),
            read_pool_size: self.read_pool_size,
            public_base_url: self.public_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
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
        .context("Failed to install tracing subscriber")?;

    let file_config = cli_args
        .config
        .as_deref()
        .map(FileConfig::load)
        .transpose()?;
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Opening SQLite catalog database at {:?}...",
        app_config.db_path
    );
    let store = SqliteRowStore::new(&app_config.db_path, app_config.read_pool_size)
        .with_context(|| format!("Failed to open catalog at {:?}", app_config.db_path))?;
    let catalog = Catalog::new(Arc::new(store));

    info!("Ready to serve at port {}!", app_config.port);
    run_server(
        catalog,
        ServerConfig {
            requests_logging_level: app_config.logging_level,
            port: app_config.port,
            public_base_url: app_config.public_base_url,
        },
    )
    .await
}
