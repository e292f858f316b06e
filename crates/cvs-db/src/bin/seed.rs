//! # Seed Data Loader
//!
//! Loads the demo store chain into a database file.
//!
//! ## Usage
//! ```bash
//! # Seed ./cvs_dev.db (default)
//! cargo run -p cvs-db --bin seed
//!
//! # Specify database path
//! cargo run -p cvs-db --bin seed -- --db ./data/cvs.db
//!
//! # Wipe existing rows first
//! cargo run -p cvs-db --bin seed -- --db ./data/cvs.db --force
//! ```

use anyhow::{bail, Context};
use clap::Parser;
use cvs_db::seed::{clear_all, is_empty, seed_demo_data};
use cvs_db::{Database, DbConfig};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Load the demo store chain into a database")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./cvs_dev.db")]
    db: String,

    /// Delete existing rows before seeding
    #[arg(short, long)]
    force: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    println!("🌱 CVS Demo Data Loader");
    println!("=======================");
    println!("Database: {}", args.db);
    println!();

    let db = Database::new(DbConfig::new(&args.db))
        .await
        .with_context(|| format!("opening {}", args.db))?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    if !is_empty(&db).await? {
        if !args.force {
            bail!(
                "{} already has data; pass --force to replace it",
                args.db
            );
        }
        clear_all(&db).await?;
        println!("✓ Existing rows removed");
    }

    let summary = seed_demo_data(&db).await?;

    println!();
    println!("  Stores:     {}", summary.stores);
    println!("  Suppliers:  {}", summary.suppliers);
    println!("  Products:   {}", summary.products);
    println!("  Employees:  {}", summary.employees);
    println!("  Stock rows: {}", summary.stock_rows);
    println!("  Orders:     {}", summary.orders);
    println!("  Sales:      {}", summary.sales);

    db.close().await;

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
