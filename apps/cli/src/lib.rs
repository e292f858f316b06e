//! # cvs-cli: Interactive Store-Chain Menu
//!
//! The numbered text menu operators use to place supplier orders, receive
//! deliveries, ring up sales and print receipts and reports.
//!
//! ## Module Structure
//! ```text
//! cvs_cli/
//! ├── lib.rs        ◄─── Cli args, tracing, startup (THIS FILE)
//! ├── config.rs     ◄─── Layered configuration (defaults, TOML, env)
//! ├── error.rs      ◄─── CliError + ErrorCode
//! ├── console.rs    ◄─── Prompting over any BufRead / Write pair
//! ├── render.rs     ◄─── Line-oriented tables and receipts
//! ├── menu.rs       ◄─── Menu loop and dispatch
//! └── commands/
//!     ├── pickers.rs    ◄─── search ─► list ─► select helpers
//!     ├── order.rs      ◄─── place, receipt, deliveries, status
//!     ├── inventory.rs  ◄─── store inventory table
//!     ├── sale.rs       ◄─── record sale, sale receipt
//!     └── report.rs     ◄─── top sellers
//! ```
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. Parse CLI args (clap)                                               │
//! │  2. Initialize tracing (RUST_LOG or -v, to stderr)                      │
//! │  3. Load AppConfig (defaults → cvs.toml → CVS__* env → --database)      │
//! │  4. Open the SQLite database (migrations run on connect)               │
//! │  5. Run the menu loop on stdin/stdout                                   │
//! │  6. Close the pool                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use cvs_core::Currency;
use cvs_db::Database;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod menu;
pub mod render;

use crate::config::AppConfig;
use crate::console::Console;
pub use error::{CliError, CliResult, ErrorCode};

/// Command line for the `cvs` binary.
#[derive(Debug, Parser)]
#[command(name = "cvs", version, about = "Convenience-store chain inventory and POS")]
pub struct Cli {
    /// Configuration file (TOML). Defaults to ./cvs.toml when present.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file, overriding the configured path
    #[arg(long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the `-v` count picks the level.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},sqlx=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Shared state handed to every menu action.
pub struct AppContext {
    pub db: Database,
    pub currency: Currency,
    /// Maximum rows returned by a LIKE search.
    pub search_limit: u32,
    /// Rows shown by the top-sellers report.
    pub leaderboard_limit: u32,
}

impl AppContext {
    /// Context with the default settings.
    pub fn new(db: Database) -> Self {
        AppContext {
            db,
            currency: Currency::krw(),
            search_limit: 50,
            leaderboard_limit: 10,
        }
    }

    pub fn from_config(db: Database, config: &AppConfig) -> Self {
        AppContext {
            db,
            currency: config.currency(),
            search_limit: config.search.limit,
            leaderboard_limit: config.report.leaderboard_limit,
        }
    }
}

/// Loads configuration, opens the database and runs the menu until the
/// operator quits or input ends.
pub async fn run(cli: Cli) -> CliResult<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(path) = cli.database {
        config.database.path = path;
    }

    if let Some(parent) = config.database.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    info!(path = %config.database.path.display(), "Opening database");
    let db = Database::new(config.db_config()).await?;
    let ctx = AppContext::from_config(db, &config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    let result = menu::run_menu(&ctx, &mut console).await;

    ctx.db.close().await;
    info!("Database closed");

    result
}
