use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pazaruvaj_feed::admin;
use pazaruvaj_feed::config::Config;
use pazaruvaj_feed::feed;
use pazaruvaj_feed::storage::{Database, DatabaseError};

/// Get the config directory path (~/.config/pazaruvaj-feed/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("pazaruvaj-feed"))
}

#[derive(Parser, Debug)]
#[command(
    name = "pazaruvaj-feed",
    about = "Export the store catalog as a Pazaruvaj XML feed"
)]
struct Args {
    /// Config file (default: ~/.config/pazaruvaj-feed/config.toml)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Catalog database, overrides the config file
    #[arg(long, value_name = "FILE", global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save the default feed settings
    Install,

    /// Remove the feed settings
    Uninstall,

    /// Generate the feed under <web_root>/files/exportimport/
    Generate {
        /// Store id, or 0 for every store (default: store_scope from config)
        #[arg(long)]
        store: Option<i64>,
    },

    /// Report the product identifiers of an existing feed file
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

async fn open_database(config: &Config) -> Result<Database> {
    let db_path = config
        .database
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    match Database::open(db_path).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::Locked) => {
            eprintln!("Error: The catalog database is locked. Please try again later.");
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open database: {}", e)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => get_config_dir()?.join("config.toml"),
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config '{}'", config_path.display()))?;
    if let Some(database) = args.database {
        config.database = database;
    }

    match args.command {
        Command::Install => {
            let db = open_database(&config).await?;
            admin::install(&db)
                .await
                .context("Failed to install feed settings")?;
            println!("Pazaruvaj feed settings installed.");
        }
        Command::Uninstall => {
            let db = open_database(&config).await?;
            let removed = admin::uninstall(&db)
                .await
                .context("Failed to remove feed settings")?;
            println!("Removed {} setting(s).", removed);
        }
        Command::Generate { store } => {
            let db = open_database(&config).await?;
            let scope = store.unwrap_or(config.store_scope);
            let notification = admin::generate_feeds_action(&db, &config.web_root, scope).await;
            if notification.is_success() {
                println!("{}", notification.message());
            } else {
                eprintln!("Error: {}", notification.message());
                std::process::exit(1);
            }
        }
        Command::Check { file } => {
            let ids = feed::read_feed_file(&file)
                .with_context(|| format!("Failed to read feed '{}'", file.display()))?;
            println!("{}: {} product(s)", file.display(), ids.len());
            for id in ids {
                println!("  {}", id);
            }
        }
    }

    Ok(())
}
