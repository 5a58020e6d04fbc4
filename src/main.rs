//! relfetch CLI entry point
//!
//! Parses flags, sets up logging (`RUST_LOG`, default `warn`, on stderr), runs
//! the fetch and renders any failure with a suggestion before exiting with
//! status 1.

use anyhow::Result;
use clap::Parser;
use relfetch::cli;
use relfetch::core::user_friendly_error;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = cli::Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            user_friendly_error(e).display();
            std::process::exit(1);
        }
    }
}
