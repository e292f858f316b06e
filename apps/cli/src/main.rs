//! # `cvs` Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (stderr)
//! 3. Load configuration, open the database, run migrations
//! 4. Run the menu loop until Quit or end of input
//!
//! The actual setup is in lib.rs so it can be tested.

use anyhow::Context;
use clap::Parser;

use cvs_cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cvs_cli::init_tracing(cli.verbose);

    cvs_cli::run(cli).await.context("cvs exited with an error")?;

    Ok(())
}
