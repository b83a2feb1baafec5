//! # Customer Workbench CLI (`cwb`)
//!
//! The `cwb` binary runs the REST API and offers the same ingestion and
//! search operations from the command line.
//!
//! ## Usage
//!
//! ```bash
//! cwb --config ./config/cwb.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `cwb init` | Create the SQLite database and run schema migrations |
//! | `cwb serve` | Start the HTTP API |
//! | `cwb ingest <file>` | Store every interaction in a `.csv` or `.json` file |
//! | `cwb get <id>` | Print one interaction |
//! | `cwb search --customer-id <n>` | Search a customer's interactions |
//! | `cwb seed` | Insert sample interactions into an empty database |
//! | `cwb stats` | Print record counts by type |
//!
//! ## Examples
//!
//! ```bash
//! cwb init --config ./config/cwb.toml
//! cwb ingest ./data/interactions.csv
//! cwb search --customer-id 202 --type CHAT --start 2024-12-01T00:00:00
//! cwb serve
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use customer_workbench::search::SearchArgs;
use customer_workbench::{config, db, get, ingest, migrate, search, seed, server, stats};

/// Customer Workbench CLI: ingest, search, and serve customer interaction
/// records.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file. See `config/cwb.example.toml` for a full example.
#[derive(Parser)]
#[command(
    name = "cwb",
    about = "Customer Workbench: ingest, search, and serve customer interaction records",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/cwb.toml")]
    config: PathBuf,

    /// Log at debug level (overridden by RUST_LOG).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Initialize the database schema.
    ///
    /// Creates the SQLite database file and the `interaction_log` table.
    /// Running it again is safe.
    Init,

    /// Start the HTTP API.
    ///
    /// Applies migrations, seeds sample data when `[seed].enabled` is set
    /// and the table is empty, then listens on `[server].bind`.
    Serve,

    /// Ingest a CSV or JSON file.
    ///
    /// `.csv` files need a header row naming the columns; `.json` files
    /// hold an array of interactions. Either every record is stored or
    /// none is.
    Ingest {
        /// Path to a `.csv` or `.json` file.
        file: PathBuf,
    },

    /// Print one interaction by id.
    Get {
        /// Interaction id.
        id: i64,
    },

    /// Search a customer's interactions.
    Search {
        /// Customer whose interactions to list (required).
        #[arg(long)]
        customer_id: Option<i32>,

        /// Only this product.
        #[arg(long)]
        product_id: Option<i32>,

        /// Only this channel: CHAT, EMAIL, TICKET or FORM.
        #[arg(long = "type")]
        interaction_type: Option<String>,

        /// Earliest interaction date, inclusive (e.g. 2024-12-01T00:00:00).
        #[arg(long)]
        start: Option<String>,

        /// Latest interaction date, inclusive.
        #[arg(long)]
        end: Option<String>,

        /// 0-based page index.
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Page size (defaults to `[paging].default_size`).
        #[arg(long)]
        size: Option<u32>,

        /// Sort order as `field[,asc|desc]`; repeatable.
        #[arg(long)]
        sort: Vec<String>,
    },

    /// Insert sample interactions when the database is empty.
    Seed {
        /// Number of records (defaults to `[seed].count`).
        #[arg(long)]
        count: Option<usize>,
    },

    /// Show record counts and the interaction date range.
    Stats,
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            migrate::run_migrations(&cfg).await?;
            println!("Database initialized successfully.");
        }
        Commands::Serve => {
            server::run_server(&cfg).await?;
        }
        Commands::Ingest { file } => {
            ingest::run_ingest(&cfg, &file).await?;
        }
        Commands::Get { id } => {
            get::run_get(&cfg, id).await?;
        }
        Commands::Search {
            customer_id,
            product_id,
            interaction_type,
            start,
            end,
            page,
            size,
            sort,
        } => {
            let args = SearchArgs {
                customer_id,
                product_id,
                interaction_type,
                start,
                end,
                page,
                size,
                sort,
            };
            search::run_search(&cfg, &args).await?;
        }
        Commands::Seed { count } => {
            let count = count.unwrap_or(cfg.seed.count);
            let service = db::open_service(&cfg).await?;
            let ids = seed::seed_if_empty(&service, count).await?;
            if ids.is_empty() {
                println!("Database already has data; nothing seeded.");
            } else {
                info!(count = ids.len(), "seed complete");
                println!("seeded: {}", ids.len());
            }
        }
        Commands::Stats => {
            stats::run_stats(&cfg).await?;
        }
    }

    Ok(())
}
