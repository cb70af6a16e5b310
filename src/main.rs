//! # Mue API server (`mue-api`)
//!
//! ## Usage
//!
//! ```bash
//! mue-api --config ./config/mue.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `mue-api init [--sample]` | Create catalog schemas, optionally seed sample quotes |
//! | `mue-api import <quotes\|images> <file>` | Load records from a JSON array |
//! | `mue-api stats` | Print totals and grouped counts |
//! | `mue-api serve` | Start the HTTP server |

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use mue_api::{config, db, ingest, migrate, server, stats};

/// Randomized quote, image and weather API.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. `QUOTES_DB_PATH`, `IMAGES_DB_PATH`, `SERVER_PORT` and
/// `WEATHER_API_KEY` override the file.
#[derive(Parser)]
#[command(
    name = "mue-api",
    about = "Randomized quote, image and weather API",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/mue.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the catalog schemas.
    ///
    /// Creates the quotes and images tables in both configured databases.
    /// Running it again is safe.
    Init {
        /// Seed a small multilingual quote set if the quotes table is empty.
        #[arg(long)]
        sample: bool,
    },

    /// Import records from a JSON array file.
    ///
    /// Records without an `id` are assigned a UUID. Records whose `id`
    /// already exists replace the stored row.
    Import {
        /// What the file contains: `quotes` or `images`.
        kind: String,
        /// Path to the JSON file.
        path: PathBuf,
    },

    /// Print row totals and grouped counts for both catalogs.
    Stats,

    /// Start the HTTP server.
    Serve,
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mue_api=info,tower_http=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init { sample } => {
            let catalog = db::connect_catalog(&cfg).await?;
            migrate::run_migrations(&catalog).await?;
            if sample {
                let seeded = ingest::seed_sample_quotes(&catalog.quotes).await?;
                println!("Sample quotes written: {}", seeded);
            }
            catalog.close().await;
            println!("Database initialized successfully.");
        }
        Commands::Import { kind, path } => {
            ingest::run_import(&cfg, &kind, &path).await?;
        }
        Commands::Stats => {
            let catalog = db::connect_catalog(&cfg).await?;
            stats::run_stats(&catalog).await?;
            catalog.close().await;
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
