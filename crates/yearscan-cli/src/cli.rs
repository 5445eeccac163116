//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Yearscan - Find the most recent plausible year in document metadata.
#[derive(Debug, Parser)]
#[command(name = "yearscan")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "YEARSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a year for every record of an `id,combined` CSV
    Extract(ExtractArgs),

    /// Flatten a metadata export into an `id,combined` CSV
    Combine(CombineArgs),

    /// Show the rule engine's view of a single text
    Scan(ScanArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Input CSV with `id` and `combined` columns
    pub input: PathBuf,

    /// Output CSV (`id,year,origin`)
    pub output: PathBuf,

    /// Use the rules only; never contact the model
    #[arg(long)]
    pub no_ai: bool,

    /// Check AI years against the record text and the blacklist
    #[arg(long)]
    pub verify: bool,

    /// Records per chunk (0 = whole file)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Do not ask for confirmation between chunks
    #[arg(short, long)]
    pub yes: bool,

    /// Copy the `combined` text into the output
    #[arg(long)]
    pub include_combined: bool,

    /// Chat-completions endpoint URL
    #[arg(long, env = "YEARSCAN_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Model identifier sent to the endpoint
    #[arg(long, env = "YEARSCAN_MODEL")]
    pub model: Option<String>,
}

/// Arguments for the combine command.
#[derive(Debug, Parser)]
pub struct CombineArgs {
    /// Metadata CSV export
    pub input: PathBuf,

    /// Output CSV (`id,combined`)
    pub output: PathBuf,

    /// Field delimiter of the input file
    #[arg(short, long, default_value_t = ';')]
    pub delimiter: char,
}

/// Arguments for the scan command.
#[derive(Debug, Parser)]
pub struct ScanArgs {
    /// Text to scan
    pub text: String,
}
