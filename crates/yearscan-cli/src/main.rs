//! Yearscan CLI - find the most recent plausible year in document metadata.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use yearscan_cli::commands;
use yearscan_cli::{Cli, CliConfig, Command};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> yearscan_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config (defaults when no file is given)
    let config = CliConfig::load(cli.config.as_deref())?;

    // Logging: RUST_LOG wins, then --log-level, then the config file
    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, config).await?,
        Command::Combine(args) => commands::execute_combine(args)?,
        Command::Scan(args) => commands::execute_scan(args)?,
    }

    Ok(())
}
